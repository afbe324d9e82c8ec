//! services/companion/src/app/quiz_task.rs
//!
//! Starting a quiz for a topic and storing the result of a finished run.

use crate::app::guard::{run_guarded, ScreenGuard};
use crate::app::state::{deliver, AppState, Delivery, SessionState};
use crate::app::tutor_task::topic_context;
use crate::error::{AppError, AppResult};
use prepwise_core::domain::QuizResult;
use prepwise_core::quiz::QuizRun;
use tokio::sync::Mutex;
use tracing::info;

/// Fetches a quiz for the topic, stores its questions and starts a run.
pub async fn start_quiz(
    app: &AppState,
    session: &Mutex<SessionState>,
    guard: &ScreenGuard,
    topic_id: &str,
) -> AppResult<Delivery<QuizRun>> {
    let (session_id, title) = topic_context(session, topic_id).await?;

    let ticket = guard.ticket();
    let Some(quiz) = run_guarded(&ticket, app.backend.fetch_quiz(&title, &session_id)).await else {
        return Ok(Delivery::Discarded);
    };

    let questions = quiz.questions;
    let delivery = deliver(session, guard, &ticket, &session_id, |state| {
        state.content.set_topic_quiz(topic_id, questions.clone());
    })
    .await;

    match delivery {
        Delivery::Applied(()) => Ok(Delivery::Applied(QuizRun::new(questions)?)),
        Delivery::Discarded => Ok(Delivery::Discarded),
    }
}

/// Finishes a run and writes its result onto the topic.
pub async fn finish_quiz(
    session: &Mutex<SessionState>,
    topic_id: &str,
    run: QuizRun,
) -> AppResult<QuizResult> {
    let result = run.finish()?;
    record_quiz_result(session, topic_id, result.clone()).await?;
    Ok(result)
}

/// Stores a quiz result computed elsewhere.
pub async fn record_quiz_result(
    session: &Mutex<SessionState>,
    topic_id: &str,
    result: QuizResult,
) -> AppResult<()> {
    let mut state = session.lock().await;
    let score = result.score_percentage;
    if !state.content.set_topic_quiz_result(topic_id, result) {
        return Err(AppError::UnknownTopic(topic_id.to_string()));
    }
    info!(topic_id, score, "Quiz result stored.");
    Ok(())
}
