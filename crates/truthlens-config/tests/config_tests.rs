// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Truthlens configuration system.

use std::io::Write;

use truthlens_config::diagnostic::ConfigError;
use truthlens_config::{
    ScoringPolicy, TruthlensConfig, load_and_validate_path, load_and_validate_str,
    load_config_from_str,
};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[client]
log_level = "debug"

[api]
base_url = "http://localhost:8000"
identity_path = "/me"
login_path = "/login"
register_path = "/register"
classify_path = "/classify"
timeout_secs = 15

[storage]
database_path = "/tmp/truthlens-test.db"

[analysis]
scoring = "banded"
seed = 7
classifier_name = "BERT"

[notifications]
ttl_secs = 5

[security]
require_tls = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.client.log_level, "debug");
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.api.classify_path, "/classify");
    assert_eq!(config.api.timeout_secs, Some(15));
    assert_eq!(config.storage.database_path, "/tmp/truthlens-test.db");
    assert_eq!(config.analysis.scoring, ScoringPolicy::Banded);
    assert_eq!(config.analysis.seed, Some(7));
    assert_eq!(config.analysis.classifier_name, "BERT");
    assert_eq!(config.notifications.ttl_secs, 5);
    assert!(!config.security.require_tls);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    assert_eq!(config.api.base_url, "https://nknu115-project.onrender.com");
    assert_eq!(config.api.identity_path, "/api/users/me");
    assert_eq!(config.api.login_path, "/api/users/login");
    assert_eq!(config.api.register_path, "/api/users/register");
    assert_eq!(config.api.classify_path, "/predict");
    assert_eq!(config.api.timeout_secs, None);
    assert!(config.storage.database_path.ends_with("truthlens.db"));
    assert_eq!(config.analysis.scoring, ScoringPolicy::Fixed);
    assert_eq!(config.analysis.classifier_name, "RoBERTa");
    assert_eq!(config.notifications.ttl_secs, 3);
    assert!(config.security.require_tls);
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[api]
base_ur = "https://example.com"
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { key, suggestion, .. } if key == "base_ur" => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("base_url"));
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n")
        .expect_err("unknown section must be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "telemetry"))
    );
}

#[test]
fn unknown_scoring_policy_is_rejected() {
    let errors = load_and_validate_str("[analysis]\nscoring = \"random\"\n")
        .expect_err("unknown policy must be rejected");
    assert!(!errors.is_empty());
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[notifications]\nttl_secs = \"three\"\n")
        .expect_err("string ttl must be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. }))
    );
}

#[test]
fn dotted_override_replaces_file_value() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    // Same shape the TRUTHLENS_API_BASE_URL env var is mapped to.
    let config: TruthlensConfig = Figment::new()
        .merge(Serialized::defaults(TruthlensConfig::default()))
        .merge(Toml::string("[api]\nbase_url = \"https://from-file.example\"\n"))
        .merge(("api.base_url", "https://from-env.example"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.api.base_url, "https://from-env.example");
    assert_eq!(
        truthlens_config::loader::map_env_key("api_base_url"),
        "api.base_url"
    );
}

#[test]
fn semantic_errors_are_collected() {
    let toml = r#"
[api]
base_url = "nope"
login_path = "login"

[notifications]
ttl_secs = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("three validation failures");
    let validations = errors
        .iter()
        .filter(|e| matches!(e, ConfigError::Validation { .. }))
        .count();
    assert_eq!(validations, 3);
}

#[test]
fn loads_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[api]\nbase_url = \"http://127.0.0.1:9000\"").expect("write");

    let config: TruthlensConfig = load_and_validate_path(file.path()).expect("valid file");
    assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
}

#[test]
fn diagnostics_render_with_code() {
    use miette::Diagnostic;

    let err = ConfigError::Validation {
        message: "notifications.ttl_secs must be at least 1".into(),
    };
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("truthlens::config::validation"));
}
