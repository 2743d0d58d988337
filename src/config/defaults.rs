//! System-wide default constants.
//!
//! Every value here is the built-in default for a `ValidinConfig` field and
//! can be overridden from `validin.toml` or the environment.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Input policy
// ============================================================================

/// Minimum trimmed input length (characters) accepted for analysis.
pub const MIN_INPUT_CHARS: usize = 50;

// ============================================================================
// Classifier
// ============================================================================

/// Hoax probability must be strictly above this to select the HOAX class.
pub const DECISION_THRESHOLD: f64 = 0.6;

/// Fixed model input length (vocabulary ids).
pub const MAX_LEN: usize = 300;

/// Upper bound accepted for `classifier.max_len`.
pub const MAX_LEN_LIMIT: usize = 10_000;

/// Width of the model's class-probability vector (valid, hoax).
pub const MODEL_CLASSES: usize = 2;

/// Index of the hoax class in the model's probability vector.
pub const HOAX_CLASS_INDEX: usize = 1;

/// Vocabulary size cap used when the tokenizer export does not carry one.
pub const MAX_FEATURES: usize = 5_000;

/// Model serving base URL.
pub const MODEL_SERVING_URL: &str = "http://127.0.0.1:8501";

/// Served model name.
pub const MODEL_NAME: &str = "hoax_lstm";

/// Model serving request timeout (seconds).
pub const MODEL_TIMEOUT_SECS: u64 = 10;

/// Vocabulary export path (Keras tokenizer JSON).
pub const VOCABULARY_PATH: &str = "tokenizer.json";

// ============================================================================
// Advisory client
// ============================================================================

/// Chat-completions endpoint of the advisory service.
pub const ADVISORY_ENDPOINT: &str = "https://api.x.ai/v1/chat/completions";

/// Model requested from the advisory service.
pub const ADVISORY_MODEL: &str = "grok-beta";

/// Per-attempt request timeout (seconds).
pub const ADVISORY_TIMEOUT_SECS: u64 = 45;

/// Total attempts including the first one.
pub const ADVISORY_MAX_ATTEMPTS: u32 = 3;

/// First backoff after a 429; doubles on every further attempt.
pub const RATE_LIMIT_BASE_DELAY_SECS: u64 = 1;

/// Fixed backoff after a request timeout.
pub const TIMEOUT_RETRY_DELAY_SECS: u64 = 1;

/// Sampling temperature sent with every advisory request.
pub const ADVISORY_TEMPERATURE: f64 = 0.7;

/// Characters of the submitted text quoted in the prompt.
pub const PROMPT_EXCERPT_CHARS: usize = 500;

/// Environment variables consulted for the advisory credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["VALIDIN_API_KEY", "XAI_API_KEY"];

// ============================================================================
// HTTP server
// ============================================================================

/// Default bind address for `validin serve`.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Maximum accepted request body (bytes).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
