// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types of the detection service.

use serde::{Deserialize, Serialize};

/// Body of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// JSON body of a registration request.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// JSON body of a classification request.
#[derive(Debug, Serialize)]
pub struct ClassifyRequest<'a> {
    pub text: &'a str,
}

/// Body of a 2xx classification response.
///
/// Carries either a `label` or an `error`. Both are optional here so the
/// adapter can tell an embedded error apart from a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// Error body of a non-success response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Detail>,
}

/// The `detail` field is a plain message, or a list of field errors when the
/// request failed schema validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Message(String),
    Fields(Vec<serde_json::Value>),
}

impl ErrorBody {
    /// The human-readable message, if the body carried one.
    ///
    /// Field-error lists have no single message and yield `None`.
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(Detail::Message(m)) if !m.trim().is_empty() => Some(m.clone()),
            _ => None,
        }
    }
}

/// Extract `detail` from a raw error body, tolerating non-JSON bodies.
pub fn detail_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
}

/// Text of an embedded `error` value: strings verbatim, anything else as JSON.
pub fn error_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used() {
        assert_eq!(
            detail_from_body(r#"{"detail":"此電子郵件已被註冊"}"#).as_deref(),
            Some("此電子郵件已被註冊")
        );
    }

    #[test]
    fn validation_list_has_no_message() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required","type":"value_error.missing"}]}"#;
        assert_eq!(detail_from_body(body), None);
    }

    #[test]
    fn non_json_body_has_no_message() {
        assert_eq!(detail_from_body("<html>Bad Gateway</html>"), None);
        assert_eq!(detail_from_body(""), None);
    }

    #[test]
    fn classify_response_variants() {
        let ok: ClassifyResponse = serde_json::from_str(r#"{"label":"假"}"#).unwrap();
        assert_eq!(ok.label.as_deref(), Some("假"));
        assert!(ok.error.is_none());

        let err: ClassifyResponse = serde_json::from_str(r#"{"error":"model offline"}"#).unwrap();
        assert_eq!(error_text(err.error.as_ref().unwrap()), "model offline");

        let structured = serde_json::json!({"code": 3});
        assert_eq!(error_text(&structured), r#"{"code":3}"#);
    }
}
