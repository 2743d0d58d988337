//! Service Configuration Module
//!
//! Provides the runtime configuration loaded from TOML files, replacing the
//! magic constants of the pipeline with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `VALIDIN_CONFIG` environment variable (path to TOML file)
//! 2. `validin.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! Environment overrides are applied on top of whichever source won. The
//! advisory credential is only ever read from the environment.
//!
//! ## Usage
//!
//! ```ignore
//! let config = ValidinConfig::load();
//! let classifier = Classifier::new(model, &config.classifier);
//! let orchestrator = Orchestrator::new(normalizer, sequencer, classifier, advisory, &config);
//! ```
//!
//! The config is handed to constructors explicitly; there is no global.

pub mod defaults;
mod validation;
mod validin_config;

pub use validation::{known_config_keys, validate_unknown_keys, ValidationWarning};
pub use validin_config::*;
