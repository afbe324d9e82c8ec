//! services/companion/src/adapters/http_backend.rs
//!
//! This module contains the HTTP adapter for the AI backend, the concrete
//! implementation of the `LearningBackend` port from the `core` crate.
//! It reports every failure to the caller and never substitutes content.

use async_trait::async_trait;
use prepwise_core::domain::{LearningPlan, Quiz, QuizQuestion, SetupAck, Topic, UserProfile};
use prepwise_core::ports::{LearningBackend, PortError, PortResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `LearningBackend` over the backend's JSON HTTP API.
#[derive(Clone)]
pub struct HttpBackendAdapter {
    client: Client,
    base_url: String,
}

impl HttpBackendAdapter {
    /// Creates a new `HttpBackendAdapter` for `base_url` (no trailing slash).
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a prepared request and returns the JSON body of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder) -> PortResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| PortError::Malformed(e.to_string()))
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> PortResult<T> {
    serde_json::from_value(body).map_err(|e| PortError::Malformed(e.to_string()))
}

/// The backend reports invalid input to the ask and plan endpoints as a 2xx
/// `{"error": "..."}` body. Setup and quiz bodies are decoded leniently instead.
fn reject_error_body(body: &Value) -> PortResult<()> {
    match body.get("error") {
        Some(Value::String(message)) => Err(PortError::Rejected(message.clone())),
        Some(other) => Err(PortError::Rejected(other.to_string())),
        None => Ok(()),
    }
}

//=========================================================================================
// Wire Request Structs
//=========================================================================================

#[derive(Serialize)]
struct SetupRequest<'a> {
    session_id: &'a str,
    name: &'a str,
    exam: &'a str,
    subjects: &'a [String],
    understanding_level: &'a str,
    school_year: &'a str,
    target_year: &'a str,
    daily_study_time: &'a str,
}

impl<'a> From<&'a UserProfile> for SetupRequest<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            session_id: &profile.session_id,
            name: &profile.name,
            exam: &profile.exam,
            subjects: &profile.subjects,
            understanding_level: &profile.understanding_level,
            school_year: &profile.school_year,
            target_year: &profile.target_year,
            daily_study_time: &profile.daily_study_time,
        }
    }
}

/// Body shared by the ask and quiz endpoints.
#[derive(Serialize)]
struct MessageRequest<'a> {
    message: &'a str,
    session_id: &'a str,
}

//=========================================================================================
// "Impure" Wire Response Structs
//=========================================================================================

#[derive(Deserialize)]
struct SetupResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct PlanResponse {
    topics: Vec<TopicRecord>,
}

#[derive(Deserialize)]
struct TopicRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    title: String,
    #[serde(default)]
    subject: String,
}
impl TopicRecord {
    fn to_domain(self) -> Topic {
        Topic::new(self.id, self.title, self.subject)
    }
}

#[derive(Deserialize)]
struct AskResponse {
    reply: String,
}

#[derive(Deserialize)]
struct QuizResponse {
    #[serde(default)]
    questions: Vec<QuizQuestionRecord>,
}

#[derive(Deserialize)]
struct QuizQuestionRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    question: String,
    options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer: String,
    #[serde(default)]
    explanation: String,
}
impl QuizQuestionRecord {
    fn to_domain(self) -> QuizQuestion {
        QuizQuestion {
            id: self.id,
            question: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
        }
    }
}

/// Generated ids arrive as `"1"` or `1`; both are stored as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

//=========================================================================================
// `LearningBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl LearningBackend for HttpBackendAdapter {
    async fn setup_profile(&self, profile: &UserProfile) -> PortResult<SetupAck> {
        info!(session_id = %profile.session_id, "Sending profile setup.");
        let request = self
            .client
            .post(self.url("/agent/setup"))
            .json(&SetupRequest::from(profile));

        let response: SetupResponse = decode(self.send(request).await?)?;
        Ok(SetupAck {
            message: response.message.unwrap_or_default(),
        })
    }

    async fn fetch_learning_plan(&self, session_id: &str) -> PortResult<LearningPlan> {
        info!(session_id, "Fetching learning plan.");
        let request = self
            .client
            .get(self.url("/agent/plan"))
            .query(&[("session_id", session_id)]);

        let body = self.send(request).await?;
        reject_error_body(&body)?;
        let response: PlanResponse = decode(body)?;
        debug!(session_id, topics = response.topics.len(), "Learning plan received.");
        Ok(LearningPlan {
            topics: response
                .topics
                .into_iter()
                .map(TopicRecord::to_domain)
                .collect(),
        })
    }

    async fn ask_question(&self, session_id: &str, prompt: &str) -> PortResult<String> {
        info!(session_id, "Asking question.");
        let request = self.client.post(self.url("/agent/ask")).json(&MessageRequest {
            message: prompt,
            session_id,
        });

        let body = self.send(request).await?;
        reject_error_body(&body)?;
        let response: AskResponse = decode(body)?;
        Ok(response.reply)
    }

    async fn fetch_quiz(&self, topic: &str, session_id: &str) -> PortResult<Quiz> {
        info!(session_id, topic, "Fetching quiz.");
        let request = self.client.post(self.url("/agent/quiz")).json(&MessageRequest {
            message: topic,
            session_id,
        });

        let response: QuizResponse = decode(self.send(request).await?)?;
        Ok(Quiz {
            topic: topic.to_string(),
            questions: response
                .questions
                .into_iter()
                .map(QuizQuestionRecord::to_domain)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn adapter(base_url: &str) -> HttpBackendAdapter {
        HttpBackendAdapter::new(Client::new(), base_url)
    }

    fn profile() -> UserProfile {
        UserProfile {
            session_id: "s1".into(),
            name: "Asha".into(),
            exam: "JEE".into(),
            subjects: vec!["Physics".into(), "Mathematics".into()],
            understanding_level: "Advanced".into(),
            school_year: "Class 12".into(),
            target_year: "2026".into(),
            daily_study_time: "4 hours".into(),
            is_profile_complete: true,
        }
    }

    #[tokio::test]
    async fn setup_sends_snake_case_profile() {
        let router = Router::new().route(
            "/agent/setup",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["session_id"], "s1");
                assert_eq!(body["understanding_level"], "Advanced");
                assert_eq!(body["subjects"], json!(["Physics", "Mathematics"]));
                assert!(body.get("is_profile_complete").is_none());
                Json(json!({ "message": "saved" }))
            }),
        );
        let base = serve(router).await;

        let ack = adapter(&base).setup_profile(&profile()).await.unwrap();
        assert_eq!(ack.message, "saved");
    }

    #[tokio::test]
    async fn plan_is_requested_with_session_query() {
        let router = Router::new().route(
            "/agent/plan",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("session_id").map(String::as_str), Some("s 1"));
                Json(json!({
                    "topics": [
                        { "id": 1, "title": "Laws of Motion", "subject": "Physics" },
                        { "id": "b2", "title": "Cell Structure" }
                    ]
                }))
            }),
        );
        let base = serve(router).await;

        let plan = adapter(&base).fetch_learning_plan("s 1").await.unwrap();
        assert_eq!(
            plan.topics,
            vec![
                Topic::new("1", "Laws of Motion", "Physics"),
                Topic::new("b2", "Cell Structure", ""),
            ]
        );
    }

    #[tokio::test]
    async fn ask_returns_reply_text() {
        let router = Router::new().route(
            "/agent/ask",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["message"], "Explain Optics");
                assert_eq!(body["session_id"], "s1");
                Json(json!({ "reply": "Light bends." }))
            }),
        );
        let base = serve(router).await;

        let reply = adapter(&base).ask_question("s1", "Explain Optics").await.unwrap();
        assert_eq!(reply, "Light bends.");
    }

    #[tokio::test]
    async fn quiz_without_questions_defaults_to_empty() {
        let router = Router::new().route(
            "/agent/quiz",
            post(|| async { Json(json!({ "topic": "ignored" })) }),
        );
        let base = serve(router).await;

        let quiz = adapter(&base).fetch_quiz("Laws of Motion", "s1").await.unwrap();
        assert_eq!(quiz.topic, "Laws of Motion");
        assert!(quiz.questions.is_empty());
    }

    #[tokio::test]
    async fn quiz_questions_are_reshaped() {
        let router = Router::new().route(
            "/agent/quiz",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["message"], "Optics");
                Json(json!({
                    "topic": "Optics",
                    "questions": [{
                        "id": 7,
                        "question": "Speed of light?",
                        "options": ["3e8 m/s", "340 m/s"],
                        "correctAnswer": "A",
                        "explanation": "In vacuum."
                    }]
                }))
            }),
        );
        let base = serve(router).await;

        let quiz = adapter(&base).fetch_quiz("Optics", "s1").await.unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].id, "7");
        assert_eq!(quiz.questions[0].correct_answer, "A");
    }

    #[tokio::test]
    async fn failures_are_reported_not_masked() {
        let router = Router::new()
            .route(
                "/agent/ask",
                post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
            )
            .route("/agent/plan", get(|| async { "not json" }))
            .route("/agent/setup", post(|| async { Json(json!({ "note": "no topics" })) }));
        let base = serve(router).await;
        let backend = adapter(&base);

        assert_eq!(
            backend.ask_question("s1", "hi").await.unwrap_err(),
            PortError::Status(502)
        );
        assert!(matches!(
            backend.fetch_learning_plan("s1").await.unwrap_err(),
            PortError::Malformed(_)
        ));
        // Setup only needs an acknowledgement; unknown fields are fine.
        assert_eq!(backend.setup_profile(&profile()).await.unwrap().message, "");
    }

    #[tokio::test]
    async fn error_bodies_reject_ask_and_plan() {
        let router = Router::new()
            .route(
                "/agent/ask",
                post(|| async { Json(json!({ "error": "Message is required" })) }),
            )
            .route(
                "/agent/plan",
                get(|| async { Json(json!({ "error": { "code": 4 } })) }),
            );
        let base = serve(router).await;
        let backend = adapter(&base);

        assert_eq!(
            backend.ask_question("s1", "").await.unwrap_err(),
            PortError::Rejected("Message is required".into())
        );
        assert_eq!(
            backend.fetch_learning_plan("s1").await.unwrap_err(),
            PortError::Rejected(r#"{"code":4}"#.into())
        );
    }

    #[tokio::test]
    async fn quiz_error_body_reshapes_to_empty_quiz() {
        let router = Router::new().route(
            "/agent/quiz",
            post(|| async {
                Json(json!({
                    "error": "Quiz generation failed",
                    "raw_output": "not a quiz"
                }))
            }),
        );
        let base = serve(router).await;

        let quiz = adapter(&base).fetch_quiz("Laws of Motion", "s1").await.unwrap();
        assert_eq!(quiz.topic, "Laws of Motion");
        assert!(quiz.questions.is_empty());

        // A decodable body is a success, so no sample quiz is substituted.
        let fallback = crate::adapters::FallbackBackend::new(std::sync::Arc::new(adapter(&base)));
        assert!(fallback.fetch_quiz("Laws of Motion", "s1").await.questions.is_empty());
    }

    #[tokio::test]
    async fn setup_error_body_still_acknowledges() {
        let router = Router::new().route(
            "/agent/setup",
            post(|| async { Json(json!({ "error": "profile agent unavailable" })) }),
        );
        let base = serve(router).await;

        let ack = adapter(&base).setup_profile(&profile()).await.unwrap();
        assert_eq!(ack.message, "");
    }

    #[tokio::test]
    async fn plan_without_topics_is_malformed() {
        let router = Router::new().route("/agent/plan", get(|| async { Json(json!({})) }));
        let base = serve(router).await;

        assert!(matches!(
            adapter(&base).fetch_learning_plan("s1").await.unwrap_err(),
            PortError::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = adapter(&format!("http://{}", addr))
            .ask_question("s1", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Transport(_)));
    }
}
