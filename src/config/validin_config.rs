//! Validin Configuration - pipeline constants as operator-tunable TOML values
//!
//! Each struct implements `Default` with the values from [`super::defaults`],
//! so a missing or empty config file behaves exactly like the built-in
//! constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a Validin deployment.
///
/// Load with `ValidinConfig::load()` which searches:
/// 1. `$VALIDIN_CONFIG` env var
/// 2. `./validin.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidinConfig {
    /// Submission acceptance policy
    #[serde(default)]
    pub input: InputConfig,

    /// Normalizer and vocabulary artifacts
    #[serde(default)]
    pub text: TextConfig,

    /// Decision rule and sequence shape
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Inference backend location
    #[serde(default)]
    pub model: ModelConfig,

    /// External advisory service
    #[serde(default)]
    pub advisory: AdvisoryConfig,

    /// Offline fallback templates
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl ValidinConfig {
    /// Load configuration using the standard search order, then apply
    /// environment overrides and read the advisory credential.
    pub fn load() -> Self {
        let mut config = Self::load_file_or_default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load from an explicit path (CLI `--config`), falling back to the
    /// standard search order when the file is unusable.
    pub fn load_with_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::load();
        };
        let mut config = match Self::load_from_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config from --config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load --config file, falling back");
                Self::load_file_or_default()
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    fn load_file_or_default() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var("VALIDIN_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from VALIDIN_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from VALIDIN_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "VALIDIN_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./validin.toml
        let local = PathBuf::from("validin.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./validin.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./validin.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No validin.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys are only warned about.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the supplied lookup.
    ///
    /// Taking the lookup as a closure keeps this testable without touching
    /// the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("VALIDIN_ADVISORY_URL") {
            self.advisory.endpoint = v;
        }
        if let Some(v) = non_empty("VALIDIN_ADVISORY_MODEL") {
            self.advisory.model = v;
        }
        if let Some(v) = non_empty("VALIDIN_SERVER_ADDR") {
            self.server.addr = v;
        }
        if let Some(v) = non_empty("VALIDIN_MODEL_URL") {
            self.model.serving_url = v;
        }
        if let Some(v) = non_empty("VALIDIN_VOCABULARY_PATH") {
            self.text.vocabulary_path = PathBuf::from(v);
        }

        self.advisory.api_key = defaults::API_KEY_ENV_VARS
            .iter()
            .find_map(|key| non_empty(key))
            .map(ApiKey::new);
    }

    /// Serialize the current config to a TOML string. The credential is
    /// never included.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate value ranges, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let t = self.classifier.threshold;
        if !t.is_finite() || t <= 0.0 || t >= 1.0 {
            errors.push(format!("classifier.threshold: must be in (0, 1), got {t}"));
        }
        let max_len = self.classifier.max_len;
        if max_len == 0 || max_len > defaults::MAX_LEN_LIMIT {
            errors.push(format!(
                "classifier.max_len: must be in 1..={}, got {max_len}",
                defaults::MAX_LEN_LIMIT
            ));
        }
        if self.classifier.hoax_class_index >= defaults::MODEL_CLASSES {
            errors.push(format!(
                "classifier.hoax_class_index: must be < {}, got {}",
                defaults::MODEL_CLASSES,
                self.classifier.hoax_class_index
            ));
        }
        if self.model.timeout_secs == 0 {
            errors.push("model.timeout_secs: must be > 0".to_string());
        }
        if self.advisory.max_attempts == 0 {
            errors.push("advisory.max_attempts: must be >= 1".to_string());
        }
        if self.advisory.timeout_secs == 0 {
            errors.push("advisory.timeout_secs: must be > 0".to_string());
        }
        if self.advisory.excerpt_chars == 0 {
            errors.push("advisory.excerpt_chars: must be > 0".to_string());
        }
        let temp = self.advisory.temperature;
        if !temp.is_finite() || !(0.0..=2.0).contains(&temp) {
            errors.push(format!("advisory.temperature: must be in [0, 2], got {temp}"));
        }
        if self.advisory.endpoint.trim().is_empty() {
            errors.push("advisory.endpoint: must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Sections
// ============================================================================

/// Submission acceptance policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Minimum trimmed length in characters
    pub min_chars: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_chars: defaults::MIN_INPUT_CHARS,
        }
    }
}

/// Normalizer and vocabulary artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Vocabulary export (Keras tokenizer JSON or flat word→id map)
    pub vocabulary_path: PathBuf,
    /// Replacement stop-word list, one word per line. Embedded list when unset.
    pub stopwords_path: Option<PathBuf>,
    /// Vocabulary size cap; overrides the value in the tokenizer export
    pub num_words: Option<usize>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            vocabulary_path: PathBuf::from(defaults::VOCABULARY_PATH),
            stopwords_path: None,
            num_words: None,
        }
    }
}

/// Decision rule and sequence shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub threshold: f64,
    pub max_len: usize,
    pub hoax_class_index: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: defaults::DECISION_THRESHOLD,
            max_len: defaults::MAX_LEN,
            hoax_class_index: defaults::HOAX_CLASS_INDEX,
        }
    }
}

/// Inference backend location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub serving_url: String,
    pub name: String,
    pub timeout_secs: u64,
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            serving_url: defaults::MODEL_SERVING_URL.to_string(),
            name: defaults::MODEL_NAME.to_string(),
            timeout_secs: defaults::MODEL_TIMEOUT_SECS,
        }
    }
}

/// How much structure the advisory prompt asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    Brief,
    #[default]
    Detailed,
}

/// Advisory credential. Never serialized, redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// External advisory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// When false the external service is never called
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub rate_limit_base_delay_secs: u64,
    pub timeout_retry_delay_secs: u64,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub excerpt_chars: usize,
    pub prompt_style: PromptStyle,
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

impl AdvisoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The credential, when the external advisory is enabled and one is set.
    pub fn usable_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref().filter(|_| self.enabled)
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: defaults::ADVISORY_ENDPOINT.to_string(),
            model: defaults::ADVISORY_MODEL.to_string(),
            timeout_secs: defaults::ADVISORY_TIMEOUT_SECS,
            max_attempts: defaults::ADVISORY_MAX_ATTEMPTS,
            rate_limit_base_delay_secs: defaults::RATE_LIMIT_BASE_DELAY_SECS,
            timeout_retry_delay_secs: defaults::TIMEOUT_RETRY_DELAY_SECS,
            temperature: defaults::ADVISORY_TEMPERATURE,
            max_tokens: None,
            excerpt_chars: defaults::PROMPT_EXCERPT_CHARS,
            prompt_style: PromptStyle::default(),
            api_key: None,
        }
    }
}

/// Offline fallback templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Append the generic manual verification checklist
    pub include_manual_tips: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            include_manual_tips: true,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::SERVER_ADDR.to_string(),
        }
    }
}
