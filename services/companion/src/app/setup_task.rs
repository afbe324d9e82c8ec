//! services/companion/src/app/setup_task.rs
//!
//! Completes onboarding: registers the profile with the backend and writes it
//! into the Profile Store.

use crate::app::state::{AppState, SessionState};
use crate::error::AppResult;
use prepwise_core::domain::SetupAck;
use prepwise_core::fallback;
use prepwise_core::onboarding::OnboardingForm;
use prepwise_core::ports::PortError;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// How the backend side of setup went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The backend acknowledged the profile.
    Confirmed(SetupAck),
    /// The backend call failed but the profile was completed locally anyway,
    /// acknowledged with the placeholder message.
    Masked { ack: SetupAck, error: PortError },
}

impl SetupOutcome {
    pub fn ack(&self) -> &SetupAck {
        match self {
            SetupOutcome::Confirmed(ack) | SetupOutcome::Masked { ack, .. } => ack,
        }
    }
}

/// Validates the form, registers it under a fresh session id and stores the
/// completed profile.
///
/// When the backend call fails the profile is still completed if
/// `mask_setup_failures` is set; otherwise the error is returned and neither
/// store is touched.
pub async fn complete_setup(
    app: &AppState,
    session: &Mutex<SessionState>,
    form: OnboardingForm,
) -> AppResult<SetupOutcome> {
    let session_id = Uuid::new_v4().to_string();
    let profile = form.into_profile(session_id.clone())?;

    let outcome = match app.backend.try_setup_profile(&profile).await {
        Ok(ack) => {
            info!(%session_id, "Profile setup confirmed by backend.");
            SetupOutcome::Confirmed(ack)
        }
        Err(e) if app.config.mask_setup_failures => {
            warn!(%session_id, error = %e, "Profile setup failed; completing profile locally.");
            SetupOutcome::Masked {
                ack: fallback::setup_ack(),
                error: e,
            }
        }
        Err(e) => return Err(e.into()),
    };

    let mut state = session.lock().await;
    state.profile.set_user_profile(profile);
    // Topics from a previous session do not belong to the new one.
    state.content.reset();
    Ok(outcome)
}
