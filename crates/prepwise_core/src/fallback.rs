//! crates/prepwise_core/src/fallback.rs
//!
//! Fixed substitute payloads used when a backend call fails and the caller
//! chooses to keep the app usable with placeholder content.

use crate::domain::{LearningPlan, Quiz, QuizQuestion, SetupAck, Topic};

pub const SETUP_MESSAGE: &str = "Profile created successfully";

pub const EXPLANATION: &str = "This topic is fundamental to your exam preparation. It covers \
essential concepts and principles that will be tested. Make sure to understand the key \
definitions, classifications, and applications.";

pub fn setup_ack() -> SetupAck {
    SetupAck {
        message: SETUP_MESSAGE.to_string(),
    }
}

/// The four-topic sample plan.
pub fn learning_plan() -> LearningPlan {
    LearningPlan {
        topics: vec![
            Topic::new("1", "Diversity in Living World", "Biology"),
            Topic::new("2", "Laws of Motion", "Physics"),
            Topic::new("3", "Cell Structure and Function", "Biology"),
            Topic::new("4", "Optics and Light", "Physics"),
        ],
    }
}

pub fn explanation() -> String {
    EXPLANATION.to_string()
}

/// The three-question sample quiz, labelled with the requested topic.
pub fn quiz(topic: &str) -> Quiz {
    Quiz {
        topic: topic.to_string(),
        questions: vec![
            sample_question(
                "1",
                "Which of the following is NOT a kingdom in the five-kingdom classification?",
                &["Monera", "Protista", "Fungi", "Insecta"],
                "Insecta",
                "Insecta is a class of Arthropoda, not a kingdom. The five kingdoms are Monera, \
                 Protista, Fungi, Plantae, and Animalia.",
            ),
            sample_question(
                "2",
                "Which scientist proposed the five-kingdom classification?",
                &["Charles Darwin", "R.H. Whittaker", "Carolus Linnaeus", "Gregor Mendel"],
                "R.H. Whittaker",
                "R.H. Whittaker proposed the five-kingdom classification system in 1969.",
            ),
            sample_question(
                "3",
                "What is the main criterion for the five-kingdom classification?",
                &["Cell structure", "Mode of nutrition", "Habitat", "All of these"],
                "All of these",
                "The five-kingdom classification uses multiple criteria including cell structure, \
                 mode of nutrition, and habitat.",
            ),
        ],
    }
}

fn sample_question(
    id: &str,
    question: &str,
    options: &[&str],
    correct_answer: &str,
    explanation: &str,
) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: correct_answer.to_string(),
        explanation: explanation.to_string(),
    }
}
