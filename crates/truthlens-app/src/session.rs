// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle: restore, login, registration, logout.
//!
//! The bearer token lives in durable storage under [`TOKEN_KEY`]. After every
//! operation settles, the token and user are either both present or both
//! absent, and the in-memory history belongs to the signed-in user.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use truthlens_core::{
    AccessToken, AnalysisResult, ApiError, Credentials, DetectorApi, KeyValueStore, Registration,
    TruthlensError, UserProfile,
};
use truthlens_security::{SecretRegistry, register_secret};

use crate::history::HistoryCache;

/// Durable key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Minimum password length accepted by registration.
pub const MIN_PASSWORD_CHARS: usize = 6;

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
const MSG_LOGIN_FAILED: &str = "Sign-in failed";
const MSG_REGISTER_FAILED: &str = "Registration failed";
const MSG_PROFILE_FAILED: &str = "Sign-in failed: could not load your profile";

/// The signed-in user and their token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: AccessToken,
    pub user: UserProfile,
}

/// Owns the session and the signed-in user's in-memory history.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn DetectorApi>,
    history_cache: HistoryCache,
    session: Option<Session>,
    history: Vec<AnalysisResult>,
    secrets: Option<SecretRegistry>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, api: Arc<dyn DetectorApi>) -> Self {
        Self {
            history_cache: HistoryCache::new(Arc::clone(&store)),
            store,
            api,
            session: None,
            history: Vec::new(),
            secrets: None,
        }
    }

    /// Register every token this store handles with a log redaction list.
    pub fn with_secret_registry(mut self, secrets: SecretRegistry) -> Self {
        self.secrets = Some(secrets);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The signed-in user's history, newest first.
    pub fn history(&self) -> &[AnalysisResult] {
        &self.history
    }

    pub fn history_cache(&self) -> &HistoryCache {
        &self.history_cache
    }

    pub fn api(&self) -> &Arc<dyn DetectorApi> {
        &self.api
    }

    /// The token as currently persisted, which may differ from memory if
    /// storage was cleared underneath us.
    pub async fn durable_token(&self) -> Result<Option<AccessToken>, TruthlensError> {
        Ok(self.store.get(TOKEN_KEY).await?.map(AccessToken::new))
    }

    fn remember_secret(&self, token: &AccessToken) {
        if let Some(secrets) = &self.secrets {
            register_secret(secrets, token.expose());
        }
    }

    /// Re-establish the session from a persisted token.
    ///
    /// Returns whether a session was restored. A token the service no longer
    /// accepts (or an unreachable service) clears it silently.
    pub async fn restore(&mut self) -> Result<bool, TruthlensError> {
        let Some(token) = self.durable_token().await? else {
            debug!("no persisted token");
            return Ok(false);
        };
        self.remember_secret(&token);

        match self.api.current_user(&token).await {
            Ok(user) => {
                let history = self.history_cache.load(&user.history_key()).await;
                info!(email = %user.email, entries = history.len(), "session restored");
                self.history = history;
                self.session = Some(Session { token, user });
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "persisted token rejected, clearing session");
                self.clear_memory();
                self.store.remove(TOKEN_KEY).await?;
                Ok(false)
            }
        }
    }

    /// Exchange credentials for a session.
    ///
    /// An existing session survives a rejected login.
    pub async fn login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<&Session, TruthlensError> {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(TruthlensError::Validation(MSG_FILL_ALL_FIELDS.to_string()));
        }

        let credentials = Credentials {
            email: email.to_string(),
            password: SecretString::from(password.expose_secret().to_string()),
        };
        let token = self
            .api
            .login(&credentials)
            .await
            .map_err(|e| auth_error(e, MSG_LOGIN_FAILED))?;
        self.remember_secret(&token);

        let previous = self.store.get(TOKEN_KEY).await?;
        self.store.set(TOKEN_KEY, token.expose()).await?;

        let user = match self.api.current_user(&token).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "identity lookup failed after login, rolling back token");
                match previous {
                    Some(prev) => self.store.set(TOKEN_KEY, &prev).await?,
                    None => self.store.remove(TOKEN_KEY).await?,
                }
                return Err(auth_error(e, MSG_PROFILE_FAILED));
            }
        };

        self.history = self.history_cache.load(&user.history_key()).await;
        info!(email = %user.email, entries = self.history.len(), "signed in");
        Ok(&*self.session.insert(Session { token, user }))
    }

    /// Create an account. Does not sign in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), TruthlensError> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || password.expose_secret().is_empty() {
            return Err(TruthlensError::Validation(MSG_FILL_ALL_FIELDS.to_string()));
        }
        if password.expose_secret().chars().count() < MIN_PASSWORD_CHARS {
            return Err(TruthlensError::Validation(
                MSG_PASSWORD_TOO_SHORT.to_string(),
            ));
        }

        let registration = Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: SecretString::from(password.expose_secret().to_string()),
        };
        self.api
            .register(&registration)
            .await
            .map_err(|e| auth_error(e, MSG_REGISTER_FAILED))?;
        info!(email, "account registered");
        Ok(())
    }

    /// End the session. Returns whether there was anything to clear.
    ///
    /// Persisted history stays on disk for the next sign-in.
    pub async fn logout(&mut self) -> Result<bool, TruthlensError> {
        let had_token = self.store.get(TOKEN_KEY).await?.is_some();
        if had_token {
            self.store.remove(TOKEN_KEY).await?;
        }
        let had_session = self.session.is_some() || !self.history.is_empty();
        self.clear_memory();
        if had_token || had_session {
            info!("signed out");
        }
        Ok(had_token || had_session)
    }

    /// Forced logout after the service rejected the token.
    pub async fn expire(&mut self) -> Result<(), TruthlensError> {
        self.clear_memory();
        self.store.remove(TOKEN_KEY).await?;
        warn!("session expired");
        Ok(())
    }

    /// Append a result to the signed-in user's history.
    ///
    /// The in-memory history only changes once the write has succeeded.
    pub async fn record(&mut self, result: AnalysisResult) -> Result<(), TruthlensError> {
        let key = self
            .user()
            .map(UserProfile::history_key)
            .ok_or(TruthlensError::LoginRequired)?;
        self.history = self.history_cache.append(&key, result).await?;
        Ok(())
    }

    fn clear_memory(&mut self) {
        self.session = None;
        self.history.clear();
    }
}

/// Map a login/registration failure.
///
/// Transport failures stay distinguishable from rejections.
fn auth_error(e: ApiError, fallback: &str) -> TruthlensError {
    match e {
        ApiError::Transport(message) => TruthlensError::Transport {
            message,
            source: None,
        },
        other => TruthlensError::Auth {
            message: other.detail().unwrap_or(fallback).to_string(),
        },
    }
}
