//! crates/prepwise_core/src/store/mod.rs
//!
//! The two in-memory state containers. Each is an explicitly owned aggregate
//! mutated only through its own operations (or the equivalent action value),
//! so the caller decides where the state lives.

pub mod content;
pub mod profile;

pub use content::{ContentAction, LearningContentState};
pub use profile::{ProfileAction, ProfileState};
