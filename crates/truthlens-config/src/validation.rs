// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use url::Url;

use crate::diagnostic::ConfigError;
use crate::model::TruthlensConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &TruthlensConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    match Url::parse(base_url) {
        Ok(url) if url.host_str().is_none() => errors.push(ConfigError::Validation {
            message: format!("api.base_url `{base_url}` has no host"),
        }),
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ConfigError::Validation {
                message: format!("api.base_url must use http or https, got `{}`", url.scheme()),
            })
        }
        Ok(_) => {}
        Err(e) => errors.push(ConfigError::Validation {
            message: format!("api.base_url `{base_url}` is not a valid URL: {e}"),
        }),
    }

    let paths = [
        ("api.identity_path", &config.api.identity_path),
        ("api.login_path", &config.api.login_path),
        ("api.register_path", &config.api.register_path),
        ("api.classify_path", &config.api.classify_path),
    ];
    for (key, path) in paths {
        if !path.starts_with('/') {
            errors.push(ConfigError::Validation {
                message: format!("{key} must start with `/`, got `{path}`"),
            });
        }
    }

    if config.api.timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "api.timeout_secs must be positive when set".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.notifications.ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "notifications.ttl_secs must be at least 1".to_string(),
        });
    }

    if config.analysis.classifier_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "analysis.classifier_name must not be empty".to_string(),
        });
    }

    let level = config.client.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "client.log_level `{}` is not one of {}",
                config.client.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = TruthlensConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn malformed_base_url_fails_validation() {
        let mut config = TruthlensConfig::default();
        config.api.base_url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "api.base_url"));
    }

    #[test]
    fn non_http_scheme_fails_validation() {
        let mut config = TruthlensConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "http or https"));
    }

    #[test]
    fn relative_path_fails_validation() {
        let mut config = TruthlensConfig::default();
        config.api.classify_path = "predict".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "api.classify_path"));
    }

    #[test]
    fn zero_ttl_and_timeout_fail_validation() {
        let mut config = TruthlensConfig::default();
        config.notifications.ttl_secs = 0;
        config.api.timeout_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "ttl_secs"));
        assert!(has_error(&errors, "timeout_secs"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = TruthlensConfig::default();
        config.client.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "client.log_level"));
    }

    #[test]
    fn localhost_http_base_url_is_valid() {
        let mut config = TruthlensConfig::default();
        config.api.base_url = "http://127.0.0.1:8000".to_string();
        config.api.timeout_secs = Some(10);
        assert!(validate_config(&config).is_ok());
    }
}
