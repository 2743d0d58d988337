//! NormalizedTokens → TokenSequence.

use std::sync::Arc;

use super::TokenEncoder;
use crate::types::{NormalizedTokens, TokenSequence};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// No token was found in the vocabulary.
    #[error("no known words in text")]
    Empty,
}

/// Encodes normalized tokens into a pre-padded sequence of `max_len` ids.
#[derive(Clone)]
pub struct Sequencer {
    encoder: Arc<dyn TokenEncoder>,
    max_len: usize,
}

impl Sequencer {
    pub fn new(encoder: Arc<dyn TokenEncoder>, max_len: usize) -> Self {
        Self { encoder, max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn sequence(&self, tokens: &NormalizedTokens) -> Result<TokenSequence, SequenceError> {
        let ids = self.encoder.encode(&tokens.joined());
        if ids.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(TokenSequence::pre_padded(&ids, self.max_len))
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("max_len", &self.max_len)
            .field("vocabulary_size", &self.encoder.vocabulary_size())
            .finish()
    }
}
