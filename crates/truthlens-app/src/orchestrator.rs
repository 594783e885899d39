// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end analysis workflow and the user-facing entry points.
//!
//! One analysis runs through: Idle -> Validating -> Authenticating ->
//! Submitting -> Normalizing -> Complete. Validation, authentication, and
//! submission failures return to Idle. Every operation converts its failure
//! into a notification before returning it, so callers never need to report
//! errors themselves.
//!
//! Operations take `&mut self`; at most one can be in flight.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use truthlens_config::TruthlensConfig;
use truthlens_core::{
    AnalysisResult, ApiError, Classification, DetectorApi, InputType, KeyValueStore,
    TruthlensError,
};

use crate::normalizer::{Normalizer, Submission};
use crate::notify::{Notifier, UiEvent};
use crate::session::SessionStore;

pub const MSG_SIGNED_IN: &str = "Signed in successfully!";
pub const MSG_REGISTERED: &str = "Registration successful! Please sign in.";
pub const MSG_SIGNED_OUT: &str = "Signed out";
pub const MSG_EMPTY_INPUT: &str = "Please enter the content to analyze";
pub const MSG_INVALID_URL: &str = "Please enter a valid URL";
pub const MSG_SESSION_EXPIRED: &str = "Your sign-in has expired, please sign in again";
pub const MSG_ANALYSIS_COMPLETE: &str = "Analysis complete!";

/// Where the current (or last) analysis request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// No request in flight.
    Idle,
    /// Checking the session and the input.
    Validating,
    /// Re-reading the persisted token.
    Authenticating,
    /// Waiting for the classifier.
    Submitting,
    /// Building the result from the label.
    Normalizing,
    /// The last request produced a result.
    Complete,
}

impl AnalysisPhase {
    /// Whether a request is in flight and new submissions should be refused.
    pub fn is_busy(self) -> bool {
        !matches!(self, AnalysisPhase::Idle | AnalysisPhase::Complete)
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisPhase::Idle => write!(f, "idle"),
            AnalysisPhase::Validating => write!(f, "validating"),
            AnalysisPhase::Authenticating => write!(f, "authenticating"),
            AnalysisPhase::Submitting => write!(f, "submitting"),
            AnalysisPhase::Normalizing => write!(f, "normalizing"),
            AnalysisPhase::Complete => write!(f, "complete"),
        }
    }
}

/// Application state: session, current result, notifications, and the
/// analysis pipeline.
pub struct Orchestrator {
    session: SessionStore,
    normalizer: Normalizer,
    notifier: Notifier,
    current: Option<AnalysisResult>,
    last_id: u64,
    phase: watch::Sender<AnalysisPhase>,
}

impl Orchestrator {
    pub fn new(session: SessionStore, normalizer: Normalizer, notifier: Notifier) -> Self {
        let (phase, _) = watch::channel(AnalysisPhase::Idle);
        Self {
            session,
            normalizer,
            notifier,
            current: None,
            last_id: 0,
            phase,
        }
    }

    /// Wire an orchestrator from configuration and the two adapters.
    pub fn from_config(
        config: &TruthlensConfig,
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn DetectorApi>,
    ) -> Self {
        Self::new(
            SessionStore::new(store, api),
            Normalizer::new(&config.analysis),
            Notifier::new(&config.notifications),
        )
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn current_result(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> AnalysisPhase {
        *self.phase.borrow()
    }

    /// Observe phase transitions, e.g. to disable a submit control.
    pub fn watch_phase(&self) -> watch::Receiver<AnalysisPhase> {
        self.phase.subscribe()
    }

    fn set_phase(&self, phase: AnalysisPhase) {
        debug!(phase = %phase, "analysis phase");
        self.phase.send_replace(phase);
    }

    /// Restore a persisted session at startup. Never notifies.
    pub async fn restore(&mut self) -> bool {
        let restored = match self.session.restore().await {
            Ok(restored) => restored,
            Err(e) => {
                warn!(error = %e, "session restore failed");
                false
            }
        };
        self.sync_last_id();
        restored
    }

    pub async fn login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), TruthlensError> {
        match self.session.login(email, password).await {
            Ok(_) => {
                self.sync_last_id();
                self.notifier.success(MSG_SIGNED_IN);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), TruthlensError> {
        match self.session.register(name, email, password).await {
            Ok(()) => {
                self.notifier.success(MSG_REGISTERED);
                self.notifier.emit(UiEvent::ShowLogin);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Sign out. A repeated logout changes nothing and stays silent.
    pub async fn logout(&mut self) -> Result<(), TruthlensError> {
        let cleared = match self.session.logout().await {
            Ok(cleared) => cleared,
            Err(e) => return Err(self.report(e)),
        };
        self.current = None;
        self.set_phase(AnalysisPhase::Idle);
        if cleared {
            self.notifier.info(MSG_SIGNED_OUT);
            self.notifier.emit(UiEvent::ViewReset);
        }
        Ok(())
    }

    /// Clear the current result and return to Idle.
    pub fn reset(&mut self) {
        self.current = None;
        self.set_phase(AnalysisPhase::Idle);
    }

    /// Run one analysis.
    pub async fn analyze(
        &mut self,
        submission: Submission,
    ) -> Result<AnalysisResult, TruthlensError> {
        match self.run(&submission).await {
            Ok(result) => Ok(result),
            Err(e) => {
                self.set_phase(AnalysisPhase::Idle);
                let message = match &e {
                    TruthlensError::Server { .. }
                    | TruthlensError::Application(_)
                    | TruthlensError::Transport { .. } => format!("Analysis request failed: {e}"),
                    _ => e.to_string(),
                };
                self.notifier.notify(e.severity(), message);
                Err(e)
            }
        }
    }

    async fn run(&mut self, submission: &Submission) -> Result<AnalysisResult, TruthlensError> {
        self.set_phase(AnalysisPhase::Validating);
        if !self.session.is_authenticated() {
            self.notifier.emit(UiEvent::LoginRequested);
            return Err(TruthlensError::LoginRequired);
        }
        validate(submission)?;

        self.set_phase(AnalysisPhase::Authenticating);
        let Some(token) = self.session.durable_token().await? else {
            warn!("persisted token missing, requesting sign-in");
            self.session.expire().await?;
            self.current = None;
            self.notifier.emit(UiEvent::LoginRequested);
            return Err(TruthlensError::LoginRequired);
        };

        self.set_phase(AnalysisPhase::Submitting);
        let api = Arc::clone(self.session.api());
        let classification = match api.classify(&token, &submission.text).await {
            Ok(classification) => classification,
            Err(ApiError::Unauthorized { .. }) => {
                self.session.expire().await?;
                self.current = None;
                self.notifier.emit(UiEvent::LoginRequested);
                return Err(TruthlensError::SessionExpired {
                    message: MSG_SESSION_EXPIRED.to_string(),
                });
            }
            Err(e) => return Err(classify_error(e)),
        };

        // An error embedded in a successful response fails normalization.
        self.set_phase(AnalysisPhase::Normalizing);
        let label = match classification {
            Classification::Verdict(label) => label,
            Classification::Rejected(message) => {
                return Err(TruthlensError::Application(message));
            }
        };
        let now = Utc::now();
        let id = self.next_id(now);
        let result = self.normalizer.normalize(label, submission, id, now);
        info!(
            id,
            label = %label,
            fake_score = result.fake_score,
            risk = %result.risk_level,
            "analysis complete"
        );

        self.current = Some(result.clone());
        self.set_phase(AnalysisPhase::Complete);
        match self.session.record(result.clone()).await {
            Ok(()) => self.notifier.success(MSG_ANALYSIS_COMPLETE),
            Err(e) => {
                warn!(error = %e, "history not saved");
                self.notifier
                    .error(format!("Analysis complete, but history could not be saved: {e}"));
            }
        }
        Ok(result)
    }

    /// Unix milliseconds, bumped past the previous id when the clock has not
    /// advanced.
    fn next_id(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last_id = millis.max(self.last_id + 1);
        self.last_id
    }

    fn sync_last_id(&mut self) {
        if let Some(max) = self.session.history().iter().map(|r| r.id).max() {
            self.last_id = self.last_id.max(max);
        }
    }

    /// Surface an error as a notification and hand it back.
    fn report(&self, e: TruthlensError) -> TruthlensError {
        self.notifier.notify(e.severity(), e.to_string());
        e
    }
}

fn validate(submission: &Submission) -> Result<(), TruthlensError> {
    let text = submission.text.trim();
    if text.is_empty() {
        return Err(TruthlensError::Validation(MSG_EMPTY_INPUT.to_string()));
    }
    if submission.input_type == InputType::Url && url::Url::parse(text).is_err() {
        return Err(TruthlensError::Validation(MSG_INVALID_URL.to_string()));
    }
    Ok(())
}

fn classify_error(e: ApiError) -> TruthlensError {
    match e {
        ApiError::Status {
            status, reason, ..
        } => TruthlensError::Server {
            status,
            message: reason.unwrap_or_default(),
        },
        ApiError::Transport(message) => TruthlensError::Transport {
            message,
            source: None,
        },
        ApiError::Decode(message) => TruthlensError::Application(format!(
            "the classifier sent an unreadable response: {message}"
        )),
        ApiError::Unauthorized { .. } => TruthlensError::SessionExpired {
            message: MSG_SESSION_EXPIRED.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_validation() {
        assert!(validate(&Submission::url("https://example.com/news/1")).is_ok());
        assert!(validate(&Submission::url("not a url")).is_err());
        assert!(validate(&Submission::url("   ")).is_err());
        assert!(validate(&Submission::content("not a url but fine")).is_ok());
    }

    #[test]
    fn busy_phases() {
        assert!(!AnalysisPhase::Idle.is_busy());
        assert!(!AnalysisPhase::Complete.is_busy());
        assert!(AnalysisPhase::Submitting.is_busy());
        assert_eq!(AnalysisPhase::Normalizing.to_string(), "normalizing");
    }

    #[test]
    fn server_status_maps_to_server_error() {
        let e = classify_error(ApiError::Status {
            status: 502,
            reason: Some("Bad Gateway".into()),
            detail: None,
        });
        assert_eq!(e.to_string(), "server error: 502 Bad Gateway");
    }
}
