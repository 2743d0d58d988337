//! Text-side types: NormalizedTokens, TokenSequence

use serde::{Deserialize, Serialize};

/// Reserved vocabulary id used for left padding.
pub const PAD_ID: u32 = 0;

/// Ordered lowercase word tokens with URLs, mentions, punctuation and
/// stop words removed. Order follows the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTokens(Vec<String>);

impl NormalizedTokens {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Space-joined form, matching how the vocabulary was fitted.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

/// Fixed-length sequence of vocabulary ids fed to the model.
///
/// Constructed only through [`TokenSequence::pre_padded`], so the length
/// always equals the `max_len` it was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSequence(Vec<u32>);

impl TokenSequence {
    /// Left-pad with [`PAD_ID`] up to `max_len`, or keep the last `max_len`
    /// ids when longer.
    pub fn pre_padded(ids: &[u32], max_len: usize) -> Self {
        let mut out = Vec::with_capacity(max_len);
        if ids.len() >= max_len {
            out.extend_from_slice(&ids[ids.len() - max_len..]);
        } else {
            out.resize(max_len - ids.len(), PAD_ID);
            out.extend_from_slice(ids);
        }
        Self(out)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[u32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_is_left_padded() {
        let seq = TokenSequence::pre_padded(&[7, 8, 9], 6);
        assert_eq!(seq.ids(), &[0, 0, 0, 7, 8, 9]);
    }

    #[test]
    fn test_long_sequence_keeps_tail() {
        let ids: Vec<u32> = (1..=10).collect();
        let seq = TokenSequence::pre_padded(&ids, 4);
        assert_eq!(seq.ids(), &[7, 8, 9, 10]);
    }

    #[test]
    fn test_length_always_max_len() {
        for n in [1usize, 299, 300, 301, 1000] {
            let ids: Vec<u32> = (1..=n as u32).collect();
            assert_eq!(TokenSequence::pre_padded(&ids, 300).len(), 300, "n = {n}");
        }
    }

    #[test]
    fn test_joined_tokens() {
        let tokens = NormalizedTokens::new(vec!["vaksin".into(), "berbahaya".into()]);
        assert_eq!(tokens.joined(), "vaksin berbahaya");
        assert_eq!(tokens.len(), 2);
    }
}
