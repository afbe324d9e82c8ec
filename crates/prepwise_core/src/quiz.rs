//! crates/prepwise_core/src/quiz.rs
//!
//! Quiz runs and the progress summary derived from stored quiz results.

use crate::domain::{rounded_percentage, QuizAnswer, QuizQuestion, QuizResult, Topic};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizRunError {
    #[error("The quiz has no questions")]
    Empty,
    #[error("No answer has been selected")]
    NothingSelected,
    #[error("Answer '{0}' is not one of the options")]
    InvalidOption(String),
    #[error("The current question has not been checked yet")]
    NotChecked,
    #[error("The quiz is already finished")]
    Finished,
    #[error("{answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
}

/// Walks the user through a quiz one question at a time.
///
/// Select an option letter, `check` it, then `advance`. Once every question is
/// checked, `finish` produces the `QuizResult` to store on the topic.
#[derive(Debug, Clone)]
pub struct QuizRun {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<String>,
    checked: bool,
    answers: Vec<QuizAnswer>,
}

impl QuizRun {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizRunError> {
        if questions.is_empty() {
            return Err(QuizRunError::Empty);
        }
        Ok(Self {
            questions,
            current: 0,
            selected: None,
            checked: false,
            answers: Vec::new(),
        })
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Selects an option letter. Ignored once the answer has been checked.
    pub fn select(&mut self, letter: &str) -> Result<(), QuizRunError> {
        if self.checked {
            return Ok(());
        }
        let question = self.current_question().ok_or(QuizRunError::Finished)?;
        let letter = letter.trim().to_ascii_uppercase();
        if question.option_for_letter(&letter).is_none() {
            return Err(QuizRunError::InvalidOption(letter));
        }
        self.selected = Some(letter);
        Ok(())
    }

    /// Records the selected answer against the correct one.
    ///
    /// Returns whether the selection was right.
    pub fn check(&mut self) -> Result<bool, QuizRunError> {
        if self.checked {
            return self
                .answers
                .last()
                .map(QuizAnswer::is_correct)
                .ok_or(QuizRunError::NotChecked);
        }
        let question = self.current_question().ok_or(QuizRunError::Finished)?;
        let selected = self.selected.clone().ok_or(QuizRunError::NothingSelected)?;
        let correct = question
            .correct_letter()
            .unwrap_or_else(|| question.correct_answer.clone());

        let answer = QuizAnswer {
            question_id: question.id.clone(),
            selected,
            correct,
        };
        let is_correct = answer.is_correct();
        self.answers.push(answer);
        self.checked = true;
        Ok(is_correct)
    }

    /// Moves to the next question. Returns `false` after the last one.
    pub fn advance(&mut self) -> Result<bool, QuizRunError> {
        if !self.checked {
            return Err(QuizRunError::NotChecked);
        }
        if self.is_last_question() {
            return Ok(false);
        }
        self.current += 1;
        self.selected = None;
        self.checked = false;
        Ok(true)
    }

    pub fn finish(self) -> Result<QuizResult, QuizRunError> {
        if self.answers.len() < self.questions.len() {
            return Err(QuizRunError::Incomplete {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }
        Ok(QuizResult::from_answers(self.answers))
    }
}

/// Live statistics shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    pub quizzes_attempted: usize,
    pub topic_count: usize,
    /// Correct answers over all answers of all results, as a rounded percentage.
    pub accuracy: u8,
    /// `(topic title, score percentage)` for each topic with a result.
    pub scores: Vec<(String, u8)>,
}

impl ProgressSummary {
    pub fn from_topics(topics: &[Topic]) -> Self {
        let results: Vec<(&Topic, &QuizResult)> = topics
            .iter()
            .filter_map(|t| t.quiz_result.as_ref().map(|r| (t, r)))
            .collect();

        let total: usize = results.iter().map(|(_, r)| r.answers.len()).sum();
        let correct: usize = results.iter().map(|(_, r)| r.correct_count()).sum();

        Self {
            quizzes_attempted: results.len(),
            topic_count: topics.len(),
            accuracy: rounded_percentage(correct, total),
            scores: results
                .iter()
                .map(|(t, r)| (t.title.clone(), r.score_percentage))
                .collect(),
        }
    }
}

/// Formats a subject list for display: all of them when three or fewer,
/// otherwise the first two and a count of the rest.
pub fn format_subjects(subjects: &[String]) -> String {
    if subjects.len() <= 3 {
        return subjects.join(", ");
    }
    format!("{} and {} more", subjects[..2].join(", "), subjects.len() - 2)
}
