//! crates/prepwise_core/src/ports.rs
//!
//! Defines the service contract (trait) for the external AI backend.
//! This trait forms the boundary of the hexagonal architecture, allowing the core
//! to be independent of the HTTP client that actually talks to the backend.

use async_trait::async_trait;

use crate::domain::{LearningPlan, Quiz, SetupAck, UserProfile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Why a backend call failed.
///
/// All variants mean the same thing to callers ("the backend call failed"); the
/// distinction only exists for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Backend unreachable: {0}")]
    Transport(String),
    #[error("Backend returned status {0}")]
    Status(u16),
    #[error("Malformed backend response: {0}")]
    Malformed(String),
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The four request types the AI backend serves. Each is a single round trip
/// with no retries.
#[async_trait]
pub trait LearningBackend: Send + Sync {
    /// Registers the onboarding answers for `profile.session_id`.
    async fn setup_profile(&self, profile: &UserProfile) -> PortResult<SetupAck>;

    /// Requests the topic list for a session.
    async fn fetch_learning_plan(&self, session_id: &str) -> PortResult<LearningPlan>;

    /// Sends a free-text prompt and returns the reply text.
    async fn ask_question(&self, session_id: &str, prompt: &str) -> PortResult<String>;

    /// Requests a generated quiz for a topic title.
    async fn fetch_quiz(&self, topic: &str, session_id: &str) -> PortResult<Quiz>;
}
