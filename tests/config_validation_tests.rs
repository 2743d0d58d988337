//! Config Validation Tests
//!
//! Exercises TOML loading, typo detection, range validation and environment
//! overrides independently from the rest of the pipeline.

use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use validin::config::{
    known_config_keys, validate_unknown_keys, ConfigError, PromptStyle, ValidinConfig,
};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_advisory_section_warns_with_suggestion() {
    let toml_str = r#"
[advisory]
max_attempt = 5
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "advisory.max_attempt");
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("advisory.max_attempts")
    );
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[input]
min_chars = 50

[classifier]
threshold = 0.6
max_len = 300

[advisory]
enabled = true
model = "grok-beta"
prompt_style = "brief"

[fallback]
include_manual_tips = false
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
}

#[test]
fn unrelated_key_has_no_suggestion() {
    let warnings = validate_unknown_keys("[server]\ncompletely_unrelated_setting = 1\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn every_default_key_is_known() {
    let rendered = ValidinConfig::default().to_toml().unwrap();
    assert!(
        validate_unknown_keys(&rendered).is_empty(),
        "default config renders unknown keys:\n{rendered}"
    );
    assert!(known_config_keys().contains("advisory.prompt_style"));
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn out_of_range_values_are_all_reported() {
    let toml_str = r#"
[classifier]
threshold = 1.5
max_len = 0

[advisory]
max_attempts = 0
temperature = 3.0
"#;
    match ValidinConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 4, "errors: {errors:?}");
            assert!(errors.iter().any(|e| e.starts_with("classifier.threshold")));
            assert!(errors.iter().any(|e| e.starts_with("classifier.max_len")));
            assert!(errors.iter().any(|e| e.starts_with("advisory.max_attempts")));
            assert!(errors.iter().any(|e| e.starts_with("advisory.temperature")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn partial_file_keeps_defaults() {
    let config = ValidinConfig::from_toml_str("[advisory]\nprompt_style = \"brief\"\n").unwrap();
    assert_eq!(config.advisory.prompt_style, PromptStyle::Brief);
    assert_eq!(config.classifier.threshold, 0.6);
    assert_eq!(config.classifier.max_len, 300);
    assert_eq!(config.input.min_chars, 50);
    assert_eq!(config.advisory.excerpt_chars, 500);
    assert_eq!(config.advisory.max_attempts, 3);
    assert_eq!(config.advisory.timeout_secs, 45);
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn load_from_file_reads_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\naddr = \"127.0.0.1:9999\"").unwrap();

    let config = ValidinConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.server.addr, "127.0.0.1:9999");
}

#[test]
fn parse_error_names_the_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[classifier\nthreshold = ").unwrap();

    let err = ValidinConfig::load_from_file(file.path()).unwrap_err();
    match &err {
        ConfigError::Parse(path, _) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let err = ValidinConfig::load_from_file(&PathBuf::from("/nonexistent/validin.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_, _)));
}

#[test]
fn api_key_in_file_is_ignored() {
    let config = ValidinConfig::from_toml_str("[advisory]\napi_key = \"sk-from-file\"\n").unwrap();
    assert!(config.advisory.api_key.is_none());
    assert!(config.advisory.usable_key().is_none());
}

// ============================================================================
// Environment Overrides
// ============================================================================

#[test]
fn env_overrides_apply_and_key_is_redacted() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("VALIDIN_ADVISORY_URL", "http://localhost:1234/v1/chat/completions"),
        ("VALIDIN_MODEL_URL", "http://model:8501"),
        ("VALIDIN_VOCABULARY_PATH", "/srv/tokenizer.json"),
        ("XAI_API_KEY", "xai-secret"),
    ]);
    let mut config = ValidinConfig::default();
    config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(config.advisory.endpoint, "http://localhost:1234/v1/chat/completions");
    assert_eq!(config.model.serving_url, "http://model:8501");
    assert_eq!(config.text.vocabulary_path, PathBuf::from("/srv/tokenizer.json"));
    assert_eq!(config.advisory.api_key.as_ref().map(|k| k.expose()), Some("xai-secret"));
    assert!(config.advisory.usable_key().is_some());

    let debug = format!("{config:?}");
    assert!(!debug.contains("xai-secret"));
    assert!(!config.to_toml().unwrap().contains("xai-secret"));
}

#[test]
fn primary_key_variable_wins() {
    let env: HashMap<&str, &str> =
        HashMap::from([("VALIDIN_API_KEY", "primary"), ("XAI_API_KEY", "secondary")]);
    let mut config = ValidinConfig::default();
    config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(config.advisory.api_key.unwrap().expose(), "primary");
}

#[test]
fn blank_env_values_are_ignored() {
    let mut config = ValidinConfig::default();
    config.apply_env_overrides(|k| (k == "VALIDIN_SERVER_ADDR" || k == "VALIDIN_API_KEY").then(|| "  ".to_string()));
    assert_eq!(config.server.addr, "0.0.0.0:8080");
    assert!(config.advisory.api_key.is_none());
}
