use serde::Serialize;

/// Result of a best-effort text task: either a value or an explicit
/// reason why nothing was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    Empty(EmptyReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum EmptyReason {
    #[error("no text provided")]
    BlankInput,
    #[error("text has no countable words")]
    NoWords,
    #[error("model {0} is unavailable")]
    ModelUnavailable(String),
    #[error("generation produced no output")]
    GenerationFailed,
}

impl EmptyReason {
    /// Whether the caller sent something unusable, as opposed to the
    /// backend failing to produce output.
    pub fn is_input_problem(&self) -> bool {
        matches!(self, EmptyReason::BlankInput | EmptyReason::NoWords)
    }
}

impl<T> Outcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(v) => Some(v),
            Outcome::Empty(_) => None,
        }
    }
}
