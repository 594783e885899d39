// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Turns Figment deserialization failures into miette diagnostics carrying
//! source spans, the list of valid keys, and a "did you mean?" hint based on
//! Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
///
/// Unknown keys carry a span into the offending file when it could be found,
/// so miette can underline the key in place.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section of `truthlens.toml` accepts.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(truthlens::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The key as written in the file.
        key: String,
        /// Closest valid key by Jaro-Winkler similarity, if any is close enough.
        suggestion: Option<String>,
        /// Comma-separated keys the enclosing section accepts.
        valid_keys: String,
        /// Byte range of the key in `src`.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The file the key was found in.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the field's type, such as a
    /// string where `timeout_secs` expects an integer.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(truthlens::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the field, e.g. `api.timeout_secs`.
        key: String,
        /// What was found and what was expected.
        detail: String,
        /// The expected type, shown as the help line.
        expected: String,
    },

    /// A field with no default that no source provided.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(truthlens::config::missing_key),
        help("add `{key} = <value>` to your truthlens.toml")
    )]
    MissingKey {
        /// The field name.
        key: String,
    },

    /// A value that parsed but failed a semantic check, such as a base URL
    /// that is not http(s).
    #[error("validation error: {message}")]
    #[diagnostic(code(truthlens::config::validation))]
    Validation {
        /// Which key failed and why.
        message: String,
    },

    /// Any other Figment failure, rendered as-is.
    #[error("configuration error: {0}")]
    #[diagnostic(code(truthlens::config::other))]
    Other(String),
}

/// Help line for [`ConfigError::UnknownKey`].
fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` pairs each config file path with its content so unknown
/// keys can be pointed at.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let (span, src) = find_source_span(&error, field, toml_sources);

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) | Kind::InvalidValue(actual, expected) => {
                let key = error
                    .path
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                ConfigError::InvalidType {
                    key,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                }
            }
            _ => ConfigError::Other(error.to_string()),
        };

        errors.push(config_error);
    }

    errors
}

fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline sources carry no file metadata; fall back to the only source.
    let source = match source_path {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };

    if let Some((path, content)) = source {
        let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
        if let Some(offset) = find_key_offset(content, &section, field) {
            let span = SourceSpan::new(offset.into(), field.len());
            let named = NamedSource::new(path, content.clone());
            return (Some(span), Some(named));
        }
    }

    (None, None)
}

/// Byte offset of `field` inside the `[path[0]]` table, or from the top when
/// `path` is empty.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
    };

    let mut byte_offset = 0;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field) {
            if after.starts_with([' ', '=', '\t']) {
                let indent = line.len() - trimmed.len();
                return Some(search_start + byte_offset + indent);
            }
        }
        byte_offset += line.len();
    }

    None
}

/// Best Jaro-Winkler match above the threshold, if any.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_base_url_for_typo() {
        let valid = &["base_url", "identity_path", "login_path", "timeout_secs"];
        assert_eq!(suggest_key("base_ur", valid), Some("base_url".to_string()));
    }

    #[test]
    fn suggests_ttl_secs() {
        let valid = &["ttl_secs"];
        assert_eq!(suggest_key("ttl_sec", valid), Some("ttl_secs".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["scoring", "seed", "classifier_name"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn wrong_value_type_names_the_field() {
        let err = crate::loader::load_config_from_str("[api]\ntimeout_secs = \"soon\"\n")
            .unwrap_err();
        let errors = figment_to_config_errors(err, &[]);
        match errors.first() {
            Some(ConfigError::InvalidType { key, .. }) => {
                assert!(key.ends_with("timeout_secs"), "{key}")
            }
            other => panic!("expected InvalidType, got {other:?}"),
        }
    }

    #[test]
    fn key_offset_is_scoped_to_section() {
        let content = "[client]\nlog_level = \"info\"\n\n[api]\nbase_ur = \"x\"\n";
        let path = vec!["api".to_string()];
        let o = find_key_offset(content, &path, "base_ur").unwrap();
        assert_eq!(&content[o..o + 7], "base_ur");
        assert!(find_key_offset(content, &path, "log_level").is_none());
    }
}
