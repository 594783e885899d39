// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock detection service for deterministic tests.
//!
//! Each operation pops its next scripted response from a FIFO queue. An
//! empty queue falls back to a fixed default so tests only script what they
//! assert on.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use truthlens_core::{
    AccessToken, AdapterType, ApiError, Classification, Credentials, DetectorApi, HealthStatus,
    Label, PluginAdapter, Registration, TruthlensError, UserProfile,
};

/// Token issued by default logins.
pub const MOCK_TOKEN: &str = "mock-token-0123456789";

/// Calls observed by a [`MockDetector`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calls {
    pub current_user: usize,
    pub login: usize,
    pub register: usize,
    pub classify: usize,
    /// Text of every classification request, in order.
    pub classified_texts: Vec<String>,
    /// Bearer token of every authenticated request, in order.
    pub tokens: Vec<String>,
}

impl Calls {
    /// Total number of requests that would have reached the network.
    pub fn total(&self) -> usize {
        self.current_user + self.login + self.register + self.classify
    }
}

#[derive(Default)]
struct Script {
    current_user: VecDeque<Result<UserProfile, ApiError>>,
    login: VecDeque<Result<AccessToken, ApiError>>,
    register: VecDeque<Result<(), ApiError>>,
    classify: VecDeque<Result<Classification, ApiError>>,
}

/// Scripted [`DetectorApi`] implementation.
///
/// Defaults when nothing is scripted: login issues [`MOCK_TOKEN`], identity
/// lookup returns [`MockDetector::default_user`], registration succeeds, and
/// classification answers `fake`.
#[derive(Default)]
pub struct MockDetector {
    script: Mutex<Script>,
    calls: Mutex<Calls>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile returned by identity lookups that were not scripted.
    pub fn default_user() -> UserProfile {
        user("amy@example.tw", "Amy")
    }

    pub async fn push_current_user(&self, response: Result<UserProfile, ApiError>) {
        self.script.lock().await.current_user.push_back(response);
    }

    pub async fn push_login(&self, response: Result<AccessToken, ApiError>) {
        self.script.lock().await.login.push_back(response);
    }

    pub async fn push_register(&self, response: Result<(), ApiError>) {
        self.script.lock().await.register.push_back(response);
    }

    pub async fn push_classify(&self, response: Result<Classification, ApiError>) {
        self.script.lock().await.classify.push_back(response);
    }

    /// Snapshot of the calls received so far.
    pub async fn calls(&self) -> Calls {
        self.calls.lock().await.clone()
    }
}

/// Build a minimal identity record.
pub fn user(email: &str, name: &str) -> UserProfile {
    UserProfile {
        email: email.to_string(),
        name: name.to_string(),
        id: None,
        extra: serde_json::Map::new(),
    }
}

#[async_trait]
impl PluginAdapter for MockDetector {
    fn name(&self) -> &str {
        "mock-detector"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Detector
    }

    async fn health_check(&self) -> Result<HealthStatus, TruthlensError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TruthlensError> {
        Ok(())
    }
}

#[async_trait]
impl DetectorApi for MockDetector {
    async fn current_user(&self, token: &AccessToken) -> Result<UserProfile, ApiError> {
        {
            let mut calls = self.calls.lock().await;
            calls.current_user += 1;
            calls.tokens.push(token.expose().to_string());
        }
        self.script
            .lock()
            .await
            .current_user
            .pop_front()
            .unwrap_or_else(|| Ok(Self::default_user()))
    }

    async fn login(&self, _credentials: &Credentials) -> Result<AccessToken, ApiError> {
        self.calls.lock().await.login += 1;
        self.script
            .lock()
            .await
            .login
            .pop_front()
            .unwrap_or_else(|| Ok(AccessToken::new(MOCK_TOKEN)))
    }

    async fn register(&self, _registration: &Registration) -> Result<(), ApiError> {
        self.calls.lock().await.register += 1;
        self.script
            .lock()
            .await
            .register
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn classify(&self, token: &AccessToken, text: &str) -> Result<Classification, ApiError> {
        {
            let mut calls = self.calls.lock().await;
            calls.classify += 1;
            calls.classified_texts.push(text.to_string());
            calls.tokens.push(token.expose().to_string());
        }
        self.script
            .lock()
            .await
            .classify
            .pop_front()
            .unwrap_or(Ok(Classification::Verdict(Label::Fake)))
    }
}
