//! Model-backed text tasks. Both pipelines take normalized text, never
//! fail past their boundary, and report unusable results as
//! [`Outcome::Empty`](crate::outcome::Outcome).

pub mod paraphrase;
pub mod summarize;

pub use paraphrase::{Complexity, Paraphrase, Paraphraser};
pub use summarize::{Summarizer, Summary, SummaryLength};
