//! services/companion/src/app/tutor_task.rs
//!
//! Topic explanations and follow-up questions ("doubts") answered by the
//! backend's ask endpoint.

use crate::app::guard::{run_guarded, ScreenGuard};
use crate::app::state::{deliver, AppState, Delivery, SessionState};
use crate::error::{AppError, AppResult};
use prepwise_core::prompts::{doubt_entry, doubt_prompt, explain_prompt};
use tokio::sync::Mutex;

/// Returns `(session_id, topic title)` for a topic of the active session.
pub(crate) async fn topic_context(
    session: &Mutex<SessionState>,
    topic_id: &str,
) -> AppResult<(String, String)> {
    let state = session.lock().await;
    let session_id = state.active_session_id().ok_or(AppError::ProfileIncomplete)?;
    let title = state
        .content
        .topic(topic_id)
        .map(|topic| topic.title.clone())
        .ok_or_else(|| AppError::UnknownTopic(topic_id.to_string()))?;
    Ok((session_id, title))
}

/// Requests an explanation and stores it as the topic's details.
pub async fn explain_topic(
    app: &AppState,
    session: &Mutex<SessionState>,
    guard: &ScreenGuard,
    topic_id: &str,
) -> AppResult<Delivery<String>> {
    let (session_id, title) = topic_context(session, topic_id).await?;

    let ticket = guard.ticket();
    let prompt = explain_prompt(&title);
    let Some(reply) = run_guarded(&ticket, app.backend.ask_question(&session_id, &prompt)).await
    else {
        return Ok(Delivery::Discarded);
    };

    Ok(deliver(session, guard, &ticket, &session_id, |state| {
        state.content.set_topic_details(topic_id, reply.clone());
        reply
    })
    .await)
}

/// Asks a follow-up question and appends the `Q/A` entry to the transcript.
///
/// Returns the stored transcript entry.
pub async fn ask_doubt(
    app: &AppState,
    session: &Mutex<SessionState>,
    guard: &ScreenGuard,
    topic_id: &str,
    question: &str,
) -> AppResult<Delivery<String>> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::EmptyQuestion);
    }
    let (session_id, title) = topic_context(session, topic_id).await?;

    let ticket = guard.ticket();
    let prompt = doubt_prompt(&title, question);
    let Some(reply) = run_guarded(&ticket, app.backend.ask_question(&session_id, &prompt)).await
    else {
        return Ok(Delivery::Discarded);
    };

    let entry = doubt_entry(question, &reply);
    Ok(deliver(session, guard, &ticket, &session_id, |state| {
        state.content.set_topic_doubts(topic_id, entry.clone());
        entry
    })
    .await)
}
