//! Advisory types: Advisory, AdvisorySource, Assessment

use serde::{Deserialize, Serialize};

use super::Verdict;

/// Where an advisory text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdvisorySource {
    /// Generated by the external text-generation service
    External,
    /// Deterministic offline template
    Fallback,
}

/// Guidance text accompanying a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub source: AdvisorySource,
    pub text: String,
    /// Diagnostic detail of the external failure that forced a fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

impl Advisory {
    pub fn external(text: impl Into<String>) -> Self {
        Self {
            source: AdvisorySource::External,
            text: text.into(),
            degraded_reason: None,
        }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            source: AdvisorySource::Fallback,
            text: text.into(),
            degraded_reason: None,
        }
    }

    pub fn with_degraded_reason(mut self, reason: impl Into<String>) -> Self {
        self.degraded_reason = Some(reason.into());
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.source == AdvisorySource::Fallback
    }
}

/// Final pipeline output: a verdict paired with exactly one advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub advisory: Advisory,
}
