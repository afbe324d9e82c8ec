//! services/companion/src/adapters/fallback.rs
//!
//! Wraps any `LearningBackend` with the fallback-on-failure policy: the caller
//! always observes a usable result, and a failed call is replaced by the fixed
//! placeholder payload after being logged. Setup is the exception and reports
//! its failure, so the setup flow can decide whether to mask it.

use prepwise_core::domain::{LearningPlan, Quiz, SetupAck, UserProfile};
use prepwise_core::fallback;
use prepwise_core::ports::{LearningBackend, PortResult};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct FallbackBackend {
    inner: Arc<dyn LearningBackend>,
}

impl FallbackBackend {
    pub fn new(inner: Arc<dyn LearningBackend>) -> Self {
        Self { inner }
    }

    /// Setup with failure reported; whether to mask it is the caller's choice.
    pub async fn try_setup_profile(&self, profile: &UserProfile) -> PortResult<SetupAck> {
        self.inner.setup_profile(profile).await
    }

    pub async fn fetch_learning_plan(&self, session_id: &str) -> LearningPlan {
        match self.inner.fetch_learning_plan(session_id).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(session_id, error = %e, "Fetching learning plan failed; using sample topics.");
                fallback::learning_plan()
            }
        }
    }

    pub async fn ask_question(&self, session_id: &str, prompt: &str) -> String {
        match self.inner.ask_question(session_id, prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id, error = %e, "Asking question failed; using generic explanation.");
                fallback::explanation()
            }
        }
    }

    pub async fn fetch_quiz(&self, topic: &str, session_id: &str) -> Quiz {
        match self.inner.fetch_quiz(topic, session_id).await {
            Ok(quiz) => quiz,
            Err(e) => {
                warn!(session_id, topic, error = %e, "Fetching quiz failed; using sample quiz.");
                fallback::quiz(topic)
            }
        }
    }
}
