//! services/companion/src/app/companion.rs
//!
//! The session controller: owns the backend handle, both stores and the
//! screen guard, and exposes one method per user interaction. This is the
//! only place the stores and the backend are composed.

use crate::adapters::{FallbackBackend, HttpBackendAdapter};
use crate::app::guard::ScreenGuard;
use crate::app::setup_task::SetupOutcome;
use crate::app::state::{AppState, Delivery, SessionState};
use crate::app::{plan_task, quiz_task, setup_task, tutor_task};
use crate::config::Config;
use crate::error::AppResult;
use prepwise_core::domain::{QuizResult, Topic, UserProfile};
use prepwise_core::onboarding::OnboardingForm;
use prepwise_core::ports::LearningBackend;
use prepwise_core::quiz::{ProgressSummary, QuizRun};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct Companion {
    app: AppState,
    session: Arc<Mutex<SessionState>>,
    guard: Arc<ScreenGuard>,
}

impl Companion {
    /// Creates a controller over an arbitrary backend implementation.
    pub fn new(backend: Arc<dyn LearningBackend>, config: Config) -> Self {
        Self {
            app: AppState {
                backend: FallbackBackend::new(backend),
                config: Arc::new(config),
            },
            session: Arc::new(Mutex::new(SessionState::default())),
            guard: Arc::new(ScreenGuard::new()),
        }
    }

    /// Creates a controller talking HTTP to `config.backend_base_url`.
    pub fn from_config(config: Config) -> Self {
        let adapter = HttpBackendAdapter::new(reqwest::Client::new(), config.backend_base_url.clone());
        Self::new(Arc::new(adapter), config)
    }

    pub async fn complete_setup(&self, form: OnboardingForm) -> AppResult<SetupOutcome> {
        setup_task::complete_setup(&self.app, &self.session, form).await
    }

    pub async fn load_plan(&self, force: bool) -> AppResult<Delivery<usize>> {
        plan_task::load_plan(&self.app, &self.session, &self.guard, force).await
    }

    pub async fn explain_topic(&self, topic_id: &str) -> AppResult<Delivery<String>> {
        tutor_task::explain_topic(&self.app, &self.session, &self.guard, topic_id).await
    }

    pub async fn ask_doubt(&self, topic_id: &str, question: &str) -> AppResult<Delivery<String>> {
        tutor_task::ask_doubt(&self.app, &self.session, &self.guard, topic_id, question).await
    }

    pub async fn start_quiz(&self, topic_id: &str) -> AppResult<Delivery<QuizRun>> {
        quiz_task::start_quiz(&self.app, &self.session, &self.guard, topic_id).await
    }

    pub async fn finish_quiz(&self, topic_id: &str, run: QuizRun) -> AppResult<QuizResult> {
        quiz_task::finish_quiz(&self.session, topic_id, run).await
    }

    pub async fn record_quiz_result(&self, topic_id: &str, result: QuizResult) -> AppResult<()> {
        quiz_task::record_quiz_result(&self.session, topic_id, result).await
    }

    pub async fn profile(&self) -> UserProfile {
        self.session.lock().await.profile.profile().clone()
    }

    pub async fn topics(&self) -> Vec<Topic> {
        self.session.lock().await.content.topics().to_vec()
    }

    pub async fn topic(&self, topic_id: &str) -> Option<Topic> {
        self.session.lock().await.content.topic(topic_id).cloned()
    }

    pub async fn summary(&self) -> ProgressSummary {
        ProgressSummary::from_topics(self.session.lock().await.content.topics())
    }

    /// Cancels in-flight requests of the current screen; their responses
    /// will not reach the stores.
    pub fn leave_screen(&self) {
        self.guard.leave_screen();
    }

    /// Resets the profile and, as a full session reset, the topic list.
    pub async fn logout(&self) {
        self.guard.leave_screen();
        let mut state = self.session.lock().await;
        let session_id = state.profile.session_id().to_string();
        state.profile.reset_profile();
        state.content.reset();
        info!(%session_id, "Session reset.");
    }
}
