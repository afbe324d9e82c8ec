//! crates/prepwise_core/src/prompts.rs
//!
//! Free-text prompts sent to the ask endpoint and the transcript format the
//! answers are stored in.

/// The prompt used to request an explanation of a topic.
pub fn explain_prompt(topic_title: &str) -> String {
    format!("Explain {}", topic_title)
}

/// The prompt used for a user-entered follow-up question.
pub fn doubt_prompt(topic_title: &str, question: &str) -> String {
    format!("I have a doubt in {}: {}", topic_title, question)
}

/// Composes one transcript entry from a question and its answer.
pub fn doubt_entry(question: &str, reply: &str) -> String {
    format!("Q: {}\nA: {}", question, reply)
}

/// Splits a transcript entry back into `(question, answer)`.
///
/// Entries not in the `Q: ...\nA: ...` shape come back whole as the question.
pub fn split_doubt_entry(entry: &str) -> (&str, Option<&str>) {
    let body = entry.strip_prefix("Q: ").unwrap_or(entry);
    match body.split_once("\nA: ") {
        Some((question, answer)) => (question, Some(answer)),
        None => (body, None),
    }
}
