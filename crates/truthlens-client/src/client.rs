// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the detection service.
//!
//! [`DetectorClient`] builds each request, attaches the bearer token, and
//! turns responses into either domain values or an [`ApiError`] describing
//! what was observed. Deciding what an error *means* is left to the caller.

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use truthlens_config::model::{ApiConfig, SecurityConfig};
use truthlens_core::{
    AccessToken, AdapterType, ApiError, Classification, Credentials, DetectorApi, HealthStatus,
    Label, PluginAdapter, Registration, TruthlensError, UserProfile,
};
use truthlens_security::{build_secure_client, validate_base_url};

use crate::types::{
    ClassifyRequest, ClassifyResponse, LoginResponse, RegisterRequest, detail_from_body,
    error_text,
};

/// HTTP adapter implementing [`DetectorApi`].
#[derive(Debug, Clone)]
pub struct DetectorClient {
    client: reqwest::Client,
    base_url: String,
    identity_path: String,
    login_path: String,
    register_path: String,
    classify_path: String,
}

impl DetectorClient {
    /// Build a client for the configured service.
    ///
    /// Fails if the base URL violates the transport policy.
    pub fn new(api: &ApiConfig, security: &SecurityConfig) -> Result<Self, TruthlensError> {
        validate_base_url(&api.base_url, security)?;
        let client = build_secure_client(api)?;
        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            identity_path: api.identity_path.clone(),
            login_path: api.login_path.clone(),
            register_path: api.register_path.clone(),
            classify_path: api.classify_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bearer(token: &AccessToken) -> Result<HeaderValue, ApiError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|e| ApiError::Transport(format!("token is not a valid header value: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Read an unsuccessful response into an [`ApiError`].
    async fn error_from(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = detail_from_body(&body);
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { detail }
        } else {
            ApiError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                detail,
            }
        }
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

#[async_trait]
impl PluginAdapter for DetectorClient {
    fn name(&self) -> &str {
        "http-detector"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Detector
    }

    /// Reachability check against the service root.
    async fn health_check(&self) -> Result<HealthStatus, TruthlensError> {
        match self.client.get(self.url("/")).send().await {
            Ok(response) if response.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(response) => Ok(HealthStatus::Degraded(format!(
                "service answered {}",
                response.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("service unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), TruthlensError> {
        Ok(())
    }
}

#[async_trait]
impl DetectorApi for DetectorClient {
    async fn current_user(&self, token: &AccessToken) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.url(&self.identity_path))
            .header(AUTHORIZATION, Self::bearer(token)?)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!(status = %status, "identity response received");
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        // OAuth2 password form: the email travels as `username`.
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &credentials.email)
            .append_pair("password", credentials.password.expose_secret())
            .finish();

        let response = self
            .client
            .post(self.url(&self.login_path))
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!(status = %status, "login response received");
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.text().await.map_err(transport)?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Some(kind) = login.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                warn!(token_type = kind, "unexpected token type, using it as bearer");
            }
        }
        Ok(AccessToken::new(login.access_token))
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = RegisterRequest {
            name: &registration.name,
            email: &registration.email,
            password: registration.password.expose_secret(),
        };

        let response = self
            .client
            .post(self.url(&self.register_path))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!(status = %status, "register response received");
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn classify(&self, token: &AccessToken, text: &str) -> Result<Classification, ApiError> {
        let response = self
            .client
            .post(self.url(&self.classify_path))
            .header(AUTHORIZATION, Self::bearer(token)?)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!(status = %status, chars = text.chars().count(), "classify response received");
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.text().await.map_err(transport)?;
        if body.trim().is_empty() {
            return Ok(Classification::Rejected(
                "the classifier returned an empty response".to_string(),
            ));
        }
        let parsed: ClassifyResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        if let Some(error) = parsed.error.as_ref().filter(|v| !v.is_null()) {
            return Ok(Classification::Rejected(error_text(error)));
        }

        match parsed.label {
            Some(label) => match Label::from_str(label.trim()) {
                Ok(label) => Ok(Classification::Verdict(label)),
                Err(_) => Ok(Classification::Rejected(format!(
                    "the classifier returned an unknown label `{label}`"
                ))),
            },
            None => Ok(Classification::Rejected(
                "the classifier response carried no label".to_string(),
            )),
        }
    }
}
