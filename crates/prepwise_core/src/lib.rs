pub mod domain;
pub mod fallback;
pub mod onboarding;
pub mod ports;
pub mod prompts;
pub mod quiz;
pub mod store;

pub use domain::{LearningPlan, Quiz, QuizAnswer, QuizQuestion, QuizResult, SetupAck, Topic, UserProfile};
pub use onboarding::{FormField, OnboardingError, OnboardingForm, WizardStep};
pub use ports::{LearningBackend, PortError, PortResult};
pub use quiz::{ProgressSummary, QuizRun, QuizRunError};
pub use store::{ContentAction, LearningContentState, ProfileAction, ProfileState};
