// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TLS enforcement for connections to the detection service.

use std::time::Duration;

use tracing::error;
use truthlens_config::model::{ApiConfig, SecurityConfig};
use truthlens_core::TruthlensError;

/// Build the reqwest client used for every service call.
///
/// TLS 1.2 is the floor. The per-request timeout comes from
/// `api.timeout_secs`; when unset, requests may wait indefinitely.
pub fn build_secure_client(api: &ApiConfig) -> Result<reqwest::Client, TruthlensError> {
    let mut builder = reqwest::Client::builder()
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .user_agent(concat!("truthlens/", env!("CARGO_PKG_VERSION")));

    if let Some(secs) = api.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build().map_err(|e| {
        error!("failed to build secure HTTP client: {e}");
        TruthlensError::Security(format!("failed to build secure HTTP client: {e}"))
    })
}

/// Check the service base URL against the transport policy.
///
/// Loopback hosts may use plain HTTP. Any other host must use HTTPS while
/// `security.require_tls` is on.
pub fn validate_base_url(url: &str, security: &SecurityConfig) -> Result<(), TruthlensError> {
    let parsed =
        url::Url::parse(url).map_err(|e| TruthlensError::Security(format!("invalid URL: {e}")))?;

    let host = parsed.host_str().unwrap_or("");
    if host.is_empty() {
        return Err(TruthlensError::Security(format!("URL `{url}` has no host")));
    }

    if is_localhost(host) || !security.require_tls {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        error!(url = %url, "TLS required for remote connections");
        return Err(TruthlensError::Security(
            "TLS required for remote connections, use HTTPS".to_string(),
        ));
    }

    Ok(())
}

/// Whether a host string names the loopback interface.
pub fn is_localhost(host: &str) -> bool {
    matches!(host, "::1" | "localhost" | "[::1]") || host.starts_with("127.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> SecurityConfig {
        SecurityConfig { require_tls: true }
    }

    #[test]
    fn client_builds_with_and_without_timeout() {
        let mut api = ApiConfig::default();
        assert!(build_secure_client(&api).is_ok());
        api.timeout_secs = Some(5);
        assert!(build_secure_client(&api).is_ok());
    }

    #[test]
    fn https_remote_is_allowed() {
        assert!(validate_base_url("https://nknu115-project.onrender.com", &strict()).is_ok());
    }

    #[test]
    fn http_remote_is_blocked() {
        let err = validate_base_url("http://detector.example.com", &strict()).unwrap_err();
        assert!(err.to_string().contains("TLS required"));
    }

    #[test]
    fn http_remote_allowed_when_tls_not_required() {
        let relaxed = SecurityConfig { require_tls: false };
        assert!(validate_base_url("http://detector.example.com", &relaxed).is_ok());
    }

    #[test]
    fn http_loopback_is_allowed() {
        assert!(validate_base_url("http://127.0.0.1:8000", &strict()).is_ok());
        assert!(validate_base_url("http://localhost:3000", &strict()).is_ok());
        assert!(validate_base_url("http://[::1]:8080", &strict()).is_ok());
    }

    #[test]
    fn garbage_url_is_rejected() {
        assert!(validate_base_url("not a url", &strict()).is_err());
    }

    #[test]
    fn loopback_detection() {
        assert!(is_localhost("127.0.0.1"));
        assert!(is_localhost("127.0.0.2"));
        assert!(is_localhost("[::1]"));
        assert!(is_localhost("localhost"));
        assert!(!is_localhost("10.0.0.1"));
        assert!(!is_localhost("nknu115-project.onrender.com"));
    }
}
