//! Validin: Indonesian news hoax classification
//!
//! Classifies a news text as HOAX or VALID with a pretrained sequence model
//! and enriches the verdict with advice from an external text-generation
//! service, falling back to deterministic templates when that service is
//! unavailable.
//!
//! ## Architecture
//!
//! - **Text**: normalizer, stop words, vocabulary, fixed-length sequencer
//! - **Classifier**: opaque model boundary plus the strict-threshold decision
//! - **Advisory**: retrying chat-completions client and offline templates
//! - **Pipeline**: per-request orchestrator and stage tracking
//! - **API**: axum JSON surface

pub mod advisory;
pub mod api;
pub mod classifier;
pub mod config;
pub mod pipeline;
pub mod text;
pub mod types;

// Re-export configuration
pub use config::ValidinConfig;

// Re-export commonly used types
pub use types::{
    Advisory, AdvisorySource, Assessment, ConfidenceLevel, NewsClass, NormalizedTokens,
    TokenSequence, Verdict,
};

// Re-export pipeline components
pub use advisory::{AdvisoryClient, AdvisoryError, FallbackAdvisor};
pub use classifier::{Classifier, InferenceModel, ModelError, ServingModel};
pub use pipeline::{Orchestrator, PipelineError, RequestStage};
pub use text::{KerasVocabulary, Normalizer, Sequencer, StopWords, TokenEncoder};
