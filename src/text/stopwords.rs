//! Indonesian stop-word set.

use std::collections::HashSet;
use std::path::Path;

use super::TextError;

const EMBEDDED_INDONESIAN: &str = include_str!("stopwords_id.txt");

/// Fixed set of words removed by the normalizer.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The Indonesian list compiled into the binary.
    pub fn indonesian() -> Self {
        Self::parse(EMBEDDED_INDONESIAN)
    }

    /// Load a replacement list: one word per line, `#` starts a comment.
    pub fn from_file(path: &Path) -> Result<Self, TextError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TextError::Io(path.to_path_buf(), e))?;
        Ok(Self::parse(&contents))
    }

    /// Embedded list unless an override path is configured.
    pub fn load(path: Option<&Path>) -> Result<Self, TextError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::indonesian()),
        }
    }

    pub fn parse(contents: &str) -> Self {
        let words = contents
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_list_loaded() {
        let sw = StopWords::indonesian();
        assert!(sw.len() > 700);
        for w in ["yang", "dan", "di", "ini", "itu", "tidak", "adalah"] {
            assert!(sw.contains(w), "missing {w}");
        }
        assert!(!sw.contains("hoaks"));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let sw = StopWords::parse("# header\n\nYang\n  dan  # inline\n");
        assert_eq!(sw.len(), 2);
        assert!(sw.contains("yang"));
        assert!(sw.contains("dan"));
    }

    #[test]
    fn test_missing_override_file_is_error() {
        let err = StopWords::load(Some(Path::new("/nonexistent/stopwords.txt"))).unwrap_err();
        assert!(matches!(err, TextError::Io(..)));
    }
}
