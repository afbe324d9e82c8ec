pub mod companion;
pub mod guard;
pub mod plan_task;
pub mod quiz_task;
pub mod setup_task;
pub mod state;
pub mod tutor_task;

// Re-export the controller and the outcome types so the binary and tests can
// reach them without walking the module tree.
pub use companion::Companion;
pub use guard::{ScreenGuard, Ticket};
pub use setup_task::SetupOutcome;
pub use state::{AppState, Delivery, SessionState};
