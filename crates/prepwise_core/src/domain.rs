//! crates/prepwise_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

/// The user's onboarding answers plus the completion gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Opaque identifier generated client-side at setup; sent with every backend call.
    pub session_id: String,
    pub name: String,
    pub exam: String,
    pub subjects: Vec<String>,
    pub understanding_level: String,
    pub school_year: String,
    pub target_year: String,
    pub daily_study_time: String,
    pub is_profile_complete: bool,
}

/// A unit of study content recommended by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub subject: String,
    /// Explanation text, absent until the user asks for one.
    pub details: Option<String>,
    /// Append-only `"Q: ...\nA: ..."` transcript. Empty until the first doubt.
    pub doubts: Vec<String>,
    pub quiz: Option<Vec<QuizQuestion>>,
    pub quiz_result: Option<QuizResult>,
}

impl Topic {
    /// Creates a freshly fetched topic with none of the per-topic enrichment.
    pub fn new(id: impl Into<String>, title: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subject: subject.into(),
            details: None,
            doubts: Vec::new(),
            quiz: None,
            quiz_result: None,
        }
    }
}

/// A single multiple-choice question. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Either an option letter (`"A"`) or the text of the correct option.
    pub correct_answer: String,
    pub explanation: String,
}

impl QuizQuestion {
    /// Resolves `correct_answer` to the letter of the matching option.
    ///
    /// Backends answer with a letter or with the option text; both are
    /// normalised here. Returns `None` when neither matches an option.
    pub fn correct_letter(&self) -> Option<String> {
        let answer = self.correct_answer.trim();

        let mut chars = answer.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let upper = c.to_ascii_uppercase();
            if upper.is_ascii_uppercase() && ((upper as u8 - b'A') as usize) < self.options.len() {
                return Some(upper.to_string());
            }
        }

        self.options
            .iter()
            .position(|option| option.trim().eq_ignore_ascii_case(answer))
            .map(option_letter)
    }

    /// Returns the option text for a letter, if the letter is in range.
    pub fn option_for_letter(&self, letter: &str) -> Option<&str> {
        let index = letter_index(letter)?;
        self.options.get(index).map(String::as_str)
    }
}

/// Maps an option position to its display letter (`0 -> "A"`).
pub fn option_letter(index: usize) -> String {
    char::from(b'A' + (index % 26) as u8).to_string()
}

fn letter_index(letter: &str) -> Option<usize> {
    let mut chars = letter.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => None,
    }
}

/// A generated quiz for one topic title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub topic: String,
    pub questions: Vec<QuizQuestion>,
}

/// One recorded answer within a quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    pub question_id: String,
    pub selected: String,
    pub correct: String,
}

impl QuizAnswer {
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}

/// Summary of a completed quiz run, written once per topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub answers: Vec<QuizAnswer>,
    pub score_percentage: u8,
}

impl QuizResult {
    /// Derives the result from the recorded answers.
    pub fn from_answers(answers: Vec<QuizAnswer>) -> Self {
        let correct = answers.iter().filter(|a| a.is_correct()).count();
        let score_percentage = rounded_percentage(correct, answers.len());
        Self {
            answers,
            score_percentage,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }
}

/// `round(part / total * 100)` with halves rounded up; 0 when `total` is 0.
pub fn rounded_percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (part.min(total) * 200 + total) / (total * 2);
    pct as u8
}

/// The backend's acknowledgement of a profile setup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupAck {
    pub message: String,
}

/// The topic list returned for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningPlan {
    pub topics: Vec<Topic>,
}
