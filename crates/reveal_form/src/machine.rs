//! Submission state machine
//!
//! ```text
//!                 Submit                 Completed
//!   Idle ─────────────────▶ Submitting ─────────────▶ Success (terminal)
//!    ▲                        │    ▲
//!    │                 Failed │    │ Submit
//!    │                        ▼    │
//!    └ ─ ─ ─ ─ ─ ─ ─ ─ ─ IdleWithError(message)
//! ```
//!
//! A submit is accepted only from `Idle` or `IdleWithError`. While `Submitting`
//! the machine stays put for at least the configured latency floor, even when
//! the transport answers sooner. The state is published on a
//! [`tokio::sync::watch`] channel so views can follow along.
//!
//! There is no cancellation: dropping an in-flight [`SubmissionMachine::submit`]
//! future leaves the machine in `Submitting`.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::fields::FormFields;
use crate::transport::{SubmitTransport, TransportError};

/// Named state of one form instance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success,
    IdleWithError(String),
}

/// Events driving the submission machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Completed,
    Failed(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionState::Success)
    }

    /// Error message to display, if the last attempt failed
    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::IdleWithError(message) => Some(message),
            _ => None,
        }
    }

    /// Whether a submit would be accepted right now
    pub fn accepts_submit(&self) -> bool {
        matches!(
            self,
            SubmissionState::Idle | SubmissionState::IdleWithError(_)
        )
    }

    /// Transition table: the next state, or `None` if `event` is not accepted here
    pub fn on_event(&self, event: &FormEvent) -> Option<Self> {
        use FormEvent::*;
        use SubmissionState::*;

        match (self, event) {
            (Idle | IdleWithError(_), Submit) => Some(Submitting),
            (Submitting, Completed) => Some(Success),
            (Submitting, Failed(message)) => Some(IdleWithError(message.clone())),
            _ => None,
        }
    }
}

/// Result of one call to [`SubmissionMachine::submit`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded,
    Failed(String),
    /// The machine was already submitting or had already succeeded
    Ignored,
}

/// Timing knobs for submissions (the `[form]` config table)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Minimum time spent in `Submitting` (ms)
    #[serde(default = "default_min_latency_ms")]
    pub min_latency_ms: u64,
    /// Give up on the transport after this long (ms)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_min_latency_ms() -> u64 {
    1500
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: default_min_latency_ms(),
            timeout_ms: None,
        }
    }
}

impl SubmissionConfig {
    pub fn with_min_latency(mut self, latency: Duration) -> Self {
        self.min_latency_ms = latency.as_millis() as u64;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn min_latency(&self) -> Duration {
        Duration::from_millis(self.min_latency_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Owner of one form's fields and [`SubmissionState`]
pub struct SubmissionMachine<T> {
    transport: T,
    config: SubmissionConfig,
    fields: Mutex<FormFields>,
    state: watch::Sender<SubmissionState>,
}

impl<T: SubmitTransport> SubmissionMachine<T> {
    pub fn new(fields: FormFields, transport: T, config: SubmissionConfig) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            transport,
            config,
            fields: Mutex::new(fields),
            state,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> SubmissionConfig {
        self.config
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Follow state changes
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current field values
    pub fn fields(&self) -> FormFields {
        self.fields.lock().clone()
    }

    /// Edit a field. Refused once the form has succeeded or for unknown names.
    pub fn set_field(&self, name: &str, value: impl Into<String>) -> bool {
        if self.state.borrow().is_success() {
            return false;
        }
        self.fields.lock().set(name, value)
    }

    /// Apply an event atomically; returns whether the state changed
    fn dispatch(&self, event: FormEvent) -> bool {
        self.state.send_if_modified(|state| match state.on_event(&event) {
            Some(next) => {
                debug!(from = ?state, to = ?next, "submission transition");
                *state = next;
                true
            }
            None => false,
        })
    }

    /// Run one submission attempt to completion
    pub async fn submit(&self) -> SubmitOutcome {
        let started = Instant::now();

        let snapshot = {
            let fields = self.fields.lock();
            if !self.dispatch(FormEvent::Submit) {
                trace!(state = ?self.state.borrow(), "submit ignored");
                return SubmitOutcome::Ignored;
            }
            fields.clone()
        };

        let attempt = self.transport.submit_record(&snapshot);
        let result = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .unwrap_or_else(|_| Err(TransportError::timed_out())),
            None => attempt.await,
        };

        tokio::time::sleep_until(started + self.config.min_latency()).await;

        match result {
            Ok(()) => {
                self.fields.lock().clear();
                self.dispatch(FormEvent::Completed);
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                let message = err.into_message();
                self.dispatch(FormEvent::Failed(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }
}
