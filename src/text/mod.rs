//! Text Preparation Module
//!
//! Turns a submitted news text into the fixed-length id sequence the model
//! expects.
//!
//! ## Stages
//!
//! - **Normalizer**: lower-case, strip mentions/URLs/symbols, drop stop words
//! - **Vocabulary**: opaque word → id lookup loaded once at startup
//! - **Sequencer**: joins tokens, encodes, pre-pads/truncates to `max_len`
//!
//! The normalizer and vocabulary are immutable after construction and are
//! shared across concurrent requests behind an `Arc`.

mod normalizer;
mod sequencer;
mod stopwords;
mod vocabulary;

pub use normalizer::Normalizer;
pub use sequencer::{SequenceError, Sequencer};
pub use stopwords::StopWords;
pub use vocabulary::{KerasVocabulary, TokenEncoder};

use std::path::PathBuf;

/// Errors raised while loading text artifacts at startup.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Failed to read {}: {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Invalid vocabulary JSON: {0}")]
    VocabularyJson(#[from] serde_json::Error),
    #[error("Unsupported vocabulary format: {0}")]
    VocabularyFormat(String),
    #[error("Invalid normalizer pattern: {0}")]
    Pattern(#[from] regex::Error),
}
