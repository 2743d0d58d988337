//! Deterministic text cleanup producing `NormalizedTokens`.

use regex::Regex;

use super::{StopWords, TextError};
use crate::types::NormalizedTokens;

/// Mentions, any character outside `[0-9A-Za-z \t]`, and `scheme://...`
/// URLs, in that alternation order.
const CLEAN_PATTERN: &str = r"(@[A-Za-z0-9]+)|([^0-9A-Za-z \t])|(\w+://\S+)";

/// Pure text normalizer.
///
/// Steps, in order:
/// 1. lower-case
/// 2. replace mentions, URLs and non-alphanumeric characters with spaces
/// 3. collapse whitespace
/// 4. drop ASCII punctuation
/// 5. split into words
/// 6. drop stop words
#[derive(Debug, Clone)]
pub struct Normalizer {
    pattern: Regex,
    stopwords: StopWords,
}

impl Normalizer {
    pub fn new(stopwords: StopWords) -> Result<Self, TextError> {
        Ok(Self {
            pattern: Regex::new(CLEAN_PATTERN)?,
            stopwords,
        })
    }

    /// Normalizer with the embedded Indonesian stop-word list.
    pub fn indonesian() -> Result<Self, TextError> {
        Self::new(StopWords::indonesian())
    }

    /// Steps 1-4: the cleaned, single-spaced string.
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = self.pattern.replace_all(&lowered, " ");
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect()
    }

    pub fn normalize(&self, text: &str) -> NormalizedTokens {
        let cleaned = self.clean(text);
        let tokens = cleaned
            .split_whitespace()
            .filter(|w| !self.stopwords.contains(w))
            .map(str::to_string)
            .collect();
        NormalizedTokens::new(tokens)
    }
}
