//! services/companion/src/app/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::adapters::FallbackBackend;
use crate::app::guard::{ScreenGuard, Ticket};
use crate::config::Config;
use prepwise_core::store::{LearningContentState, ProfileState};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

//=========================================================================================
// AppState (Shared, Created Once at Startup)
//=========================================================================================

/// Collaborators every flow needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub backend: FallbackBackend,
    pub config: Arc<Config>,
}

//=========================================================================================
// SessionState (The Two Stores of One User Session)
//=========================================================================================

/// The two stores, owned together and passed explicitly to each flow.
#[derive(Debug, Default)]
pub struct SessionState {
    pub profile: ProfileState,
    pub content: LearningContentState,
}

impl SessionState {
    /// The session id to send with backend calls, once setup has completed.
    pub fn active_session_id(&self) -> Option<String> {
        if self.profile.is_profile_complete() {
            Some(self.profile.session_id().to_string())
        } else {
            None
        }
    }
}

/// What happened to a response once it came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<T> {
    /// The response was written into the store.
    Applied(T),
    /// The screen that asked for it was left first; nothing was written.
    Discarded,
}

impl<T> Delivery<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Delivery::Applied(value) => Some(value),
            Delivery::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Delivery::Discarded)
    }
}

/// Writes a response into the stores if its ticket is still current and the
/// session it was requested for is still the active one.
pub(crate) async fn deliver<T>(
    session: &Mutex<SessionState>,
    guard: &ScreenGuard,
    ticket: &Ticket,
    session_id: &str,
    apply: impl FnOnce(&mut SessionState) -> T,
) -> Delivery<T> {
    let mut state = session.lock().await;
    if !guard.is_current(ticket) || state.active_session_id().as_deref() != Some(session_id) {
        debug!(session_id, generation = ticket.generation(), "Discarding stale response.");
        return Delivery::Discarded;
    }
    Delivery::Applied(apply(&mut *state))
}
