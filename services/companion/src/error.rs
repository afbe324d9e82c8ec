//! services/companion/src/error.rs
//!
//! Defines the primary error type for the companion service.

use crate::config::ConfigError;
use prepwise_core::{OnboardingError, PortError, QuizRunError};

/// The primary error type for the `companion` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backend failure the caller chose not to mask.
    #[error("Backend error: {0}")]
    Port(#[from] PortError),

    /// The onboarding form is missing required answers.
    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizRunError),

    #[error("No topic with id '{0}'")]
    UnknownTopic(String),

    #[error("The profile has not been set up yet")]
    ProfileIncomplete,

    #[error("The question is empty")]
    EmptyQuestion,

    /// Represents a standard Input/Output error (e.g., reading the terminal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
