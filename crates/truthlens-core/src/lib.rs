// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Truthlens news-check client.
//!
//! Holds the error taxonomy, the domain types shared by every crate, and the
//! two adapter traits the application core is written against: durable
//! key-value storage and the remote detection service.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ApiError, TruthlensError};
pub use types::{
    AccessToken, AdapterType, AnalysisDetails, AnalysisNarrative, AnalysisResult,
    Classification, Credentials, HealthStatus, HistoryKey, InputType, Label, Registration,
    RiskLevel, Severity, UserProfile,
};

pub use traits::{DetectorApi, KeyValueStore, PluginAdapter};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn label_accepts_english_and_service_spellings() {
        assert_eq!(Label::from_str("fake").unwrap(), Label::Fake);
        assert_eq!(Label::from_str("假").unwrap(), Label::Fake);
        assert_eq!(Label::from_str("real").unwrap(), Label::Real);
        assert_eq!(Label::from_str("真").unwrap(), Label::Real);
        assert!(Label::from_str("maybe").is_err());

        assert_eq!(Label::Fake.to_string(), "fake");
        let parsed: Label = serde_json::from_str("\"假\"").unwrap();
        assert_eq!(parsed, Label::Fake);
    }

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_fake_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_fake_score(30), RiskLevel::Low);
        assert_eq!(RiskLevel::from_fake_score(31), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_fake_score(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_fake_score(61), RiskLevel::High);
        assert_eq!(RiskLevel::from_fake_score(100), RiskLevel::High);
    }

    proptest! {
        #[test]
        fn risk_level_is_monotonic_in_fake_score(a in 0u8..=100, b in 0u8..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let rank = |r: RiskLevel| match r {
                RiskLevel::Low => 0,
                RiskLevel::Medium => 1,
                RiskLevel::High => 2,
            };
            prop_assert!(rank(RiskLevel::from_fake_score(lo)) <= rank(RiskLevel::from_fake_score(hi)));
        }
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiJ9.secret.sig");
        let printed = format!("{token:?}");
        assert!(!printed.contains("secret"));
        assert_eq!(token.expose(), "eyJhbGciOiJIUzI1NiJ9.secret.sig");
    }

    #[test]
    fn history_key_derives_from_email() {
        let user: UserProfile =
            serde_json::from_value(serde_json::json!({"email": "a@b.tw", "name": "A", "id": 3}))
                .unwrap();
        assert_eq!(user.history_key().as_str(), "history_a@b.tw");
        assert_eq!(user.id, Some(3));
        assert!(user.extra.is_empty());
    }

    #[test]
    fn user_profile_keeps_unknown_fields() {
        let user: UserProfile = serde_json::from_value(serde_json::json!({
            "email": "a@b.tw",
            "name": "A",
            "is_active": true
        }))
        .unwrap();
        assert_eq!(user.extra.get("is_active"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn analysis_result_serializes_camel_case() {
        let result = AnalysisResult {
            id: 1,
            timestamp: chrono::DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            input_type: InputType::Content,
            content_preview: "text".into(),
            fake_score: 85,
            real_score: 15,
            confidence: 92,
            risk_level: RiskLevel::High,
            analysis_narrative: AnalysisNarrative {
                source: "s".into(),
                content: "c".into(),
                structure: "st".into(),
                language: "l".into(),
            },
            recommendations: vec!["r".into()],
            details: AnalysisDetails {
                keywords: vec![],
                source_analysis: "x".into(),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["inputType"], "content");
        assert_eq!(json["fakeScore"], 85);
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["analysisNarrative"]["structure"], "st");
        assert_eq!(json["details"]["sourceAnalysis"], "x");
    }

    #[test]
    fn severity_table_indices_are_dense() {
        for (i, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(severity.index(), i);
        }
    }

    #[test]
    fn error_severity_and_display() {
        assert_eq!(TruthlensError::LoginRequired.severity(), Severity::Info);
        let err = TruthlensError::Validation("please enter a valid URL".into());
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.to_string(), "please enter a valid URL");

        let server = TruthlensError::Server {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(server.to_string(), "server error: 502 Bad Gateway");
    }

    #[test]
    fn api_error_detail() {
        let err = ApiError::Status {
            status: 400,
            reason: Some("Bad Request".into()),
            detail: Some("email already registered".into()),
        };
        assert_eq!(err.detail(), Some("email already registered"));
        assert_eq!(ApiError::Transport("refused".into()).detail(), None);
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_store<T: KeyValueStore>() {}
        fn _assert_detector<T: DetectorApi>() {}
    }
}
