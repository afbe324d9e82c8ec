//! crates/prepwise_core/src/store/content.rs
//!
//! The Learning Content Store: the topic list and the per-topic enrichment
//! (explanation, doubt transcript, quiz, quiz result) accumulated as the user
//! works through it.
//!
//! Topics are never removed once fetched, only enriched in place. Every
//! per-topic mutation targeting an unknown id is a silent no-op.

use std::collections::HashMap;

use crate::domain::{QuizQuestion, QuizResult, Topic};

/// A mutation of the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAction {
    SetTopics(Vec<Topic>),
    SetTopicDetails { topic_id: String, details: String },
    SetTopicDoubts { topic_id: String, doubt: String },
    SetTopicQuiz { topic_id: String, quiz: Vec<QuizQuestion> },
    SetTopicQuizResult { topic_id: String, result: QuizResult },
}

#[derive(Debug, Clone, Default)]
pub struct LearningContentState {
    topics: Vec<Topic>,
    /// id -> position in `topics`; first occurrence wins on duplicate ids.
    index: HashMap<String, usize>,
}

impl PartialEq for LearningContentState {
    fn eq(&self, other: &Self) -> bool {
        self.topics == other.topics
    }
}

impl Eq for LearningContentState {}

impl LearningContentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topics in the order the backend returned them.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.index.get(topic_id).map(|&pos| &self.topics[pos])
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// True once any topic carries explanation, doubts, a quiz or a result.
    pub fn has_enrichment(&self) -> bool {
        self.topics.iter().any(|t| {
            t.details.is_some() || !t.doubts.is_empty() || t.quiz.is_some() || t.quiz_result.is_some()
        })
    }

    /// Replaces the whole topic list, discarding any accumulated enrichment.
    pub fn set_topics(&mut self, topics: Vec<Topic>) {
        let mut index = HashMap::with_capacity(topics.len());
        for (pos, topic) in topics.iter().enumerate() {
            index.entry(topic.id.clone()).or_insert(pos);
        }
        self.topics = topics;
        self.index = index;
    }

    /// Sets or overwrites the explanation of one topic.
    pub fn set_topic_details(&mut self, topic_id: &str, details: impl Into<String>) -> bool {
        self.with_topic(topic_id, |topic| topic.details = Some(details.into()))
    }

    /// Appends one transcript entry, preserving call order.
    pub fn set_topic_doubts(&mut self, topic_id: &str, doubt: impl Into<String>) -> bool {
        self.with_topic(topic_id, |topic| topic.doubts.push(doubt.into()))
    }

    /// Sets the quiz question list, overwriting any prior quiz.
    pub fn set_topic_quiz(&mut self, topic_id: &str, quiz: Vec<QuizQuestion>) -> bool {
        self.with_topic(topic_id, |topic| topic.quiz = Some(quiz))
    }

    /// Sets the quiz result, overwriting any prior result.
    pub fn set_topic_quiz_result(&mut self, topic_id: &str, result: QuizResult) -> bool {
        self.with_topic(topic_id, |topic| topic.quiz_result = Some(result))
    }

    /// Drops every topic. Only used for a full session reset.
    pub fn reset(&mut self) {
        self.topics.clear();
        self.index.clear();
    }

    /// Applies an action. Returns `false` when it targeted an unknown topic.
    pub fn apply(&mut self, action: ContentAction) -> bool {
        match action {
            ContentAction::SetTopics(topics) => {
                self.set_topics(topics);
                true
            }
            ContentAction::SetTopicDetails { topic_id, details } => {
                self.set_topic_details(&topic_id, details)
            }
            ContentAction::SetTopicDoubts { topic_id, doubt } => {
                self.set_topic_doubts(&topic_id, doubt)
            }
            ContentAction::SetTopicQuiz { topic_id, quiz } => self.set_topic_quiz(&topic_id, quiz),
            ContentAction::SetTopicQuizResult { topic_id, result } => {
                self.set_topic_quiz_result(&topic_id, result)
            }
        }
    }

    fn with_topic(&mut self, topic_id: &str, f: impl FnOnce(&mut Topic)) -> bool {
        match self.index.get(topic_id) {
            Some(&pos) => {
                f(&mut self.topics[pos]);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuizAnswer;

    fn sample_topics() -> Vec<Topic> {
        vec![
            Topic::new("1", "Diversity in Living World", "Biology"),
            Topic::new("2", "Laws of Motion", "Physics"),
            Topic::new("3", "Cell Structure and Function", "Biology"),
        ]
    }

    fn sample_result() -> QuizResult {
        QuizResult::from_answers(vec![QuizAnswer {
            question_id: "1".to_string(),
            selected: "A".to_string(),
            correct: "A".to_string(),
        }])
    }

    #[test]
    fn set_topic_details_touches_only_the_matching_topic() {
        let mut state = LearningContentState::new();
        state.set_topics(sample_topics());

        assert!(state.set_topic_details("2", "x"));

        for topic in state.topics() {
            if topic.id == "2" {
                assert_eq!(topic.details.as_deref(), Some("x"));
            } else {
                assert_eq!(topic.details, None);
            }
        }
    }

    #[test]
    fn unknown_topic_id_is_a_silent_no_op() {
        let mut state = LearningContentState::new();
        state.set_topics(sample_topics());
        let before = state.clone();

        assert!(!state.set_topic_details("missing", "text"));
        assert!(!state.set_topic_doubts("missing", "Q: ?\nA: !"));
        assert!(!state.set_topic_quiz("missing", Vec::new()));
        assert!(!state.set_topic_quiz_result("missing", sample_result()));
        assert_eq!(state, before);
    }

    #[test]
    fn empty_store_ignores_details_for_missing_topic() {
        let mut state = LearningContentState::new();
        state.set_topic_details("missing", "text");
        assert!(state.is_empty());
        assert_eq!(state, LearningContentState::new());
    }

    #[test]
    fn doubts_append_in_call_order() {
        let mut state = LearningContentState::new();
        state.set_topics(sample_topics());

        state.set_topic_doubts("1", "d1");
        state.set_topic_doubts("1", "d2");

        let topic = state.topic("1").unwrap();
        assert_eq!(topic.doubts, vec!["d1".to_string(), "d2".to_string()]);
        assert!(state.topic("2").unwrap().doubts.is_empty());
    }

    #[test]
    fn quiz_result_is_idempotent() {
        let result = sample_result();

        let mut once = LearningContentState::new();
        once.set_topics(sample_topics());
        once.set_topic_quiz_result("3", result.clone());

        let mut twice = once.clone();
        twice.set_topic_quiz_result("3", result.clone());

        assert_eq!(once, twice);
        assert_eq!(twice.topic("3").unwrap().quiz_result.as_ref(), Some(&result));
    }

    #[test]
    fn set_quiz_overwrites_prior_quiz() {
        let mut state = LearningContentState::new();
        state.set_topics(sample_topics());

        let first = vec![QuizQuestion {
            id: "1".into(),
            question: "First?".into(),
            options: vec!["A".into(), "B".into()],
            correct_answer: "A".into(),
            explanation: String::new(),
        }];
        state.set_topic_quiz("2", first);
        state.set_topic_quiz("2", Vec::new());

        assert_eq!(state.topic("2").unwrap().quiz.as_deref(), Some(&[][..]));
    }

    #[test]
    fn set_topics_discards_enrichment() {
        let mut state = LearningContentState::new();
        state.set_topics(sample_topics());
        state.set_topic_details("1", "explained");
        assert!(state.has_enrichment());

        state.set_topics(sample_topics());
        assert!(!state.has_enrichment());
        assert_eq!(state.topics(), sample_topics().as_slice());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_occurrence() {
        let mut state = LearningContentState::new();
        state.set_topics(vec![
            Topic::new("1", "First", "Biology"),
            Topic::new("1", "Second", "Physics"),
        ]);

        state.set_topic_details("1", "x");
        assert_eq!(state.topics()[0].details.as_deref(), Some("x"));
        assert_eq!(state.topics()[1].details, None);
        assert_eq!(state.topic("1").unwrap().title, "First");
    }

    #[test]
    fn apply_dispatches_each_action() {
        let mut state = LearningContentState::new();
        assert!(state.apply(ContentAction::SetTopics(sample_topics())));
        assert!(state.apply(ContentAction::SetTopicDoubts {
            topic_id: "1".into(),
            doubt: "Q: why?\nA: because".into(),
        }));
        assert!(!state.apply(ContentAction::SetTopicDetails {
            topic_id: "9".into(),
            details: "nope".into(),
        }));
        assert_eq!(state.topic("1").unwrap().doubts.len(), 1);
    }

    #[test]
    fn reset_clears_topics_and_index() {
        let mut state = LearningContentState::new();
        state.set_topics(sample_topics());
        state.reset();
        assert!(state.is_empty());
        assert!(state.topic("1").is_none());
    }
}
