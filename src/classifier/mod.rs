//! Classifier Module
//!
//! Wraps the opaque inference model and applies the decision rule.
//!
//! ## Architecture
//!
//! - **InferenceModel**: `predict(sequence) -> probability vector` boundary.
//!   The model is loaded (or connected to) once at startup and shared.
//! - **Classifier**: picks the hoax probability, applies the strict
//!   `> threshold` rule, and reports confidence for the selected class.
//! - **ServingModel**: REST backend for a TensorFlow-Serving-style endpoint.
//!
//! A model failure is never retried here; without a verdict the request
//! cannot continue.

mod serving;

pub use serving::ServingModel;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::types::{TokenSequence, Verdict};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model transport error: {0}")]
    Transport(String),
    #[error("model server returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid model output: {0}")]
    InvalidOutput(String),
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Opaque model boundary.
#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Class-probability vector for one sequence.
    async fn predict(&self, sequence: &TokenSequence) -> Result<Vec<f64>, ModelError>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Binary hoax/valid classifier.
#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn InferenceModel>,
    threshold: f64,
    hoax_class_index: usize,
}

impl Classifier {
    pub fn new(model: Arc<dyn InferenceModel>, config: &ClassifierConfig) -> Self {
        Self {
            model,
            threshold: config.threshold,
            hoax_class_index: config.hoax_class_index,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn backend_name(&self) -> &'static str {
        self.model.backend_name()
    }

    pub async fn classify(&self, sequence: &TokenSequence) -> Result<Verdict, ModelError> {
        let probs = self.model.predict(sequence).await?;
        let hoax_prob = self.hoax_probability(&probs)?;
        let verdict = Verdict::from_hoax_probability(hoax_prob, self.threshold);

        debug!(
            hoax_prob,
            threshold = self.threshold,
            class = %verdict.class,
            confidence = verdict.confidence,
            "Classification complete"
        );
        Ok(verdict)
    }

    fn hoax_probability(&self, probs: &[f64]) -> Result<f64, ModelError> {
        if probs.len() < 2 {
            return Err(ModelError::InvalidOutput(format!(
                "expected at least 2 class probabilities, got {}",
                probs.len()
            )));
        }
        let p = *probs.get(self.hoax_class_index).ok_or_else(|| {
            ModelError::InvalidOutput(format!(
                "hoax class index {} out of range for {} classes",
                self.hoax_class_index,
                probs.len()
            ))
        })?;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidOutput(format!(
                "hoax probability {p} outside [0, 1]"
            )));
        }
        Ok(p)
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("backend", &self.model.backend_name())
            .field("threshold", &self.threshold)
            .field("hoax_class_index", &self.hoax_class_index)
            .finish()
    }
}
