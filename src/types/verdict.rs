//! Classification types: NewsClass, Verdict, ConfidenceLevel

use serde::{Deserialize, Serialize};

/// Binary classification outcome for a submitted news text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NewsClass {
    Hoax,
    Valid,
}

impl NewsClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hoax => "HOAX",
            Self::Valid => "VALID",
        }
    }
}

impl std::fmt::Display for NewsClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output.
///
/// `confidence` is a percentage for the *selected* class: the hoax
/// probability when the class is HOAX, its complement when VALID.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub class: NewsClass,
    pub confidence: f64,
}

impl Verdict {
    /// Apply the strict `hoax_prob > threshold` decision rule.
    pub fn from_hoax_probability(hoax_prob: f64, threshold: f64) -> Self {
        if hoax_prob > threshold {
            Self {
                class: NewsClass::Hoax,
                confidence: hoax_prob * 100.0,
            }
        } else {
            Self {
                class: NewsClass::Valid,
                confidence: (1.0 - hoax_prob) * 100.0,
            }
        }
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_percent(self.confidence)
    }
}

/// Coarse confidence label embedded in advisory prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Tinggi,
    Sedang,
    Rendah,
}

impl ConfidenceLevel {
    pub fn from_percent(confidence: f64) -> Self {
        if confidence > 80.0 {
            Self::Tinggi
        } else if confidence > 60.0 {
            Self::Sedang
        } else {
            Self::Rendah
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tinggi => "tinggi",
            Self::Sedang => "sedang",
            Self::Rendah => "rendah",
        }
    }
}
