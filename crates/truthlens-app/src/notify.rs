// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing notifications and presentation events.
//!
//! A single notification slot: each new notification replaces the previous
//! one and expires after the configured TTL. Expiry is evaluated when the slot
//! is read, so no timer task is needed. Every notification is also broadcast
//! as a [`UiEvent`] alongside the view-switch events the orchestrator emits.

use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::debug;

use truthlens_config::model::NotificationConfig;
use truthlens_core::Severity;

const EVENT_CAPACITY: usize = 32;

/// One user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub issued_at: Instant,
}

/// Events for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A notification was issued.
    Notified(Notification),
    /// The user must sign in before continuing.
    LoginRequested,
    /// Registration succeeded; show the sign-in form.
    ShowLogin,
    /// The session ended; return to the default view.
    ViewReset,
}

/// Owns the notification slot and the event channel.
pub struct Notifier {
    ttl: Duration,
    slot: watch::Sender<Option<Notification>>,
    events: broadcast::Sender<UiEvent>,
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self::with_ttl(Duration::from_secs(config.ttl_secs))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { ttl, slot, events }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the active notification.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        let notification = Notification {
            message: message.into(),
            severity,
            issued_at: Instant::now(),
        };
        debug!(severity = %severity, message = %notification.message, "notification");
        self.slot.send_replace(Some(notification.clone()));
        self.emit(UiEvent::Notified(notification));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Severity::Info, message);
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn emit(&self, event: UiEvent) {
        let _ = self.events.send(event);
    }

    /// The active notification, if one was issued less than a TTL ago.
    pub fn current(&self) -> Option<Notification> {
        let expired = matches!(
            &*self.slot.borrow(),
            Some(n) if n.issued_at.elapsed() >= self.ttl
        );
        if expired {
            self.slot.send_replace(None);
        }
        self.slot.borrow().clone()
    }

    /// Drop the active notification immediately.
    pub fn dismiss(&self) {
        self.slot.send_replace(None);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Observe slot changes (issue, expiry on read, dismissal).
    pub fn watch(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.subscribe()
    }
}
