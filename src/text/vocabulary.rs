//! Word → id vocabulary fitted alongside the classification model.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use super::TextError;

/// Opaque text encoder boundary.
///
/// Implementations must be immutable after construction; one instance is
/// shared by every request.
pub trait TokenEncoder: Send + Sync {
    /// Encode a space-separated string. Unknown words are dropped.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Number of known words, for startup logging.
    fn vocabulary_size(&self) -> usize;
}

/// Vocabulary exported from a Keras `Tokenizer`.
///
/// Accepts `Tokenizer.to_json()` output (where `config.word_index` is itself
/// a JSON-encoded string) or a flat `{"word": id}` object.
#[derive(Debug, Clone, Default)]
pub struct KerasVocabulary {
    word_index: HashMap<String, u32>,
    /// Ids at or above this cap are dropped during encoding.
    num_words: Option<usize>,
}

impl KerasVocabulary {
    pub fn new(word_index: HashMap<String, u32>, num_words: Option<usize>) -> Self {
        Self {
            word_index,
            num_words,
        }
    }

    /// Load from disk. `num_words_override` wins over the value in the file.
    pub fn load(path: &Path, num_words_override: Option<usize>) -> Result<Self, TextError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TextError::Io(path.to_path_buf(), e))?;
        let mut vocab = Self::from_json_str(&contents)?;
        if num_words_override.is_some() {
            vocab.num_words = num_words_override;
        }
        Ok(vocab)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, TextError> {
        let root: Value = serde_json::from_str(contents)?;

        let (index_value, num_words) = match root.get("config") {
            Some(config) => {
                let index = config.get("word_index").ok_or_else(|| {
                    TextError::VocabularyFormat("tokenizer config has no word_index".to_string())
                })?;
                let num_words = config
                    .get("num_words")
                    .and_then(Value::as_u64)
                    .and_then(|n| usize::try_from(n).ok());
                (index.clone(), num_words)
            }
            None => (root, None),
        };

        // Keras double-encodes the index as a JSON string
        let index_value = match index_value {
            Value::String(s) => serde_json::from_str(&s)?,
            other => other,
        };

        let Value::Object(map) = index_value else {
            return Err(TextError::VocabularyFormat(
                "word_index must be a JSON object".to_string(),
            ));
        };

        let mut word_index = HashMap::with_capacity(map.len());
        for (word, id) in map {
            let id = id
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    TextError::VocabularyFormat(format!("id for '{word}' is not a u32"))
                })?;
            word_index.insert(word, id);
        }

        Ok(Self {
            word_index,
            num_words,
        })
    }

    pub fn num_words(&self) -> Option<usize> {
        self.num_words
    }

    /// Apply `cap` only when neither the file nor an override set one.
    pub fn with_default_num_words(mut self, cap: usize) -> Self {
        self.num_words.get_or_insert(cap);
        self
    }

    fn lookup(&self, word: &str) -> Option<u32> {
        let id = *self.word_index.get(word)?;
        match self.num_words {
            Some(cap) if id as usize >= cap => None,
            _ => Some(id),
        }
    }
}

impl TokenEncoder for KerasVocabulary {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.split(' ')
            .filter(|w| !w.is_empty())
            .filter_map(|w| self.lookup(w))
            .collect()
    }

    fn vocabulary_size(&self) -> usize {
        self.word_index.len()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for KerasVocabulary {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(w, id)| (w.into(), id)).collect(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cap_does_not_replace_file_value() {
        let capped = KerasVocabulary::new(HashMap::from([("a".to_string(), 9)]), Some(5));
        assert_eq!(capped.with_default_num_words(5_000).num_words(), Some(5));

        let uncapped: KerasVocabulary = [("a", 9)].into_iter().collect();
        let uncapped = uncapped.with_default_num_words(5);
        assert_eq!(uncapped.num_words(), Some(5));
        assert!(uncapped.encode("a").is_empty());
    }

    #[test]
    fn test_flat_map_format() {
        let vocab = KerasVocabulary::from_json_str(r#"{"vaksin": 3, "aman": 7}"#).unwrap();
        assert_eq!(vocab.encode("vaksin sangat aman"), vec![3, 7]);
        assert_eq!(vocab.vocabulary_size(), 2);
    }

    #[test]
    fn test_keras_tokenizer_export() {
        let json = r#"{
            "class_name": "Tokenizer",
            "config": {
                "num_words": 5,
                "oov_token": null,
                "word_index": "{\"berita\": 1, \"hoaks\": 2, \"palsu\": 9}"
            }
        }"#;
        let vocab = KerasVocabulary::from_json_str(json).unwrap();
        assert_eq!(vocab.num_words(), Some(5));
        // id 9 is beyond num_words and dropped, like Keras texts_to_sequences
        assert_eq!(vocab.encode("berita palsu hoaks"), vec![1, 2]);
    }

    #[test]
    fn test_word_index_as_object() {
        let json = r#"{"config": {"word_index": {"berita": 4}}}"#;
        let vocab = KerasVocabulary::from_json_str(json).unwrap();
        assert_eq!(vocab.encode("berita"), vec![4]);
        assert_eq!(vocab.num_words(), None);
    }

    #[test]
    fn test_rejects_non_integer_ids() {
        let err = KerasVocabulary::from_json_str(r#"{"berita": "satu"}"#).unwrap_err();
        assert!(matches!(err, TextError::VocabularyFormat(_)));
    }

    #[test]
    fn test_load_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        std::fs::write(&path, r#"{"a": 1, "b": 2, "c": 3}"#).unwrap();
        let vocab = KerasVocabulary::load(&path, Some(3)).unwrap();
        assert_eq!(vocab.encode("a b c"), vec![1, 2]);
    }
}
