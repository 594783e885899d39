// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The remote detection service: authentication plus text classification.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AccessToken, Classification, Credentials, Registration, UserProfile};

/// Client-side view of the detection service's HTTP contract.
#[async_trait]
pub trait DetectorApi: PluginAdapter {
    /// Resolves a bearer token to the signed-in user's identity.
    async fn current_user(&self, token: &AccessToken) -> Result<UserProfile, ApiError>;

    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError>;

    /// Creates an account. The response body is ignored beyond its status.
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;

    /// Sends raw text to the classifier.
    async fn classify(&self, token: &AccessToken, text: &str) -> Result<Classification, ApiError>;
}
