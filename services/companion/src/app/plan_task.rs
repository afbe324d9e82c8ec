//! services/companion/src/app/plan_task.rs
//!
//! Fetches the learning plan for the active session into the Learning Content
//! Store.

use crate::app::guard::{run_guarded, ScreenGuard};
use crate::app::state::{deliver, AppState, Delivery, SessionState};
use crate::error::{AppError, AppResult};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Loads the topic list.
///
/// An already-populated list is kept (and its enrichment preserved) unless
/// `force` is set, since replacing it discards every explanation, doubt and
/// quiz result collected so far. Returns the number of topics.
pub async fn load_plan(
    app: &AppState,
    session: &Mutex<SessionState>,
    guard: &ScreenGuard,
    force: bool,
) -> AppResult<Delivery<usize>> {
    let session_id = {
        let state = session.lock().await;
        let session_id = state.active_session_id().ok_or(AppError::ProfileIncomplete)?;
        if !force && !state.content.is_empty() {
            return Ok(Delivery::Applied(state.content.topics().len()));
        }
        session_id
    };

    let ticket = guard.ticket();
    let Some(plan) = run_guarded(&ticket, app.backend.fetch_learning_plan(&session_id)).await else {
        return Ok(Delivery::Discarded);
    };

    Ok(deliver(session, guard, &ticket, &session_id, |state| {
        let count = plan.topics.len();
        if state.content.has_enrichment() {
            warn!(%session_id, "Refreshing the plan drops enrichment stored on the old topics.");
        }
        state.content.set_topics(plan.topics);
        info!(%session_id, topics = count, "Learning plan stored.");
        count
    })
    .await)
}
