//! Pure text utilities shared by the pipelines and handlers.

pub mod normalize;
pub mod readability;
pub mod rouge;
pub mod sentences;

pub use normalize::{compression_percentage, normalize, word_count};
