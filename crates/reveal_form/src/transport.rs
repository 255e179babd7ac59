//! Submission transport boundary
//!
//! The submission machine never talks to a network itself. It hands a snapshot
//! of the fields to a [`SubmitTransport`] and waits for the outcome.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reveal_core::RevealError;
use thiserror::Error;
use tracing::trace;

use crate::fields::FormFields;

/// Failure reported by a transport. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn timed_out() -> Self {
        Self::new("submission timed out")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<TransportError> for RevealError {
    fn from(err: TransportError) -> Self {
        RevealError::SubmissionTransport(err.message)
    }
}

/// Delivers a submitted record somewhere
pub trait SubmitTransport: Send + Sync {
    fn submit_record(
        &self,
        fields: &FormFields,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

impl<T: SubmitTransport> SubmitTransport for Arc<T> {
    fn submit_record(
        &self,
        fields: &FormFields,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).submit_record(fields)
    }
}

/// In-process transport that waits a fixed latency and then succeeds,
/// unless failures have been scripted with [`MockTransport::fail_next`]
#[derive(Debug, Default)]
pub struct MockTransport {
    latency: Duration,
    script: Mutex<VecDeque<Result<(), TransportError>>>,
    records: Mutex<Vec<FormFields>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    /// Make the next unscripted call fail with `message`
    pub fn fail_next(&self, message: impl Into<String>) -> &Self {
        self.script
            .lock()
            .push_back(Err(TransportError::new(message)));
        self
    }

    /// Make the next unscripted call succeed
    pub fn succeed_next(&self) -> &Self {
        self.script.lock().push_back(Ok(()));
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Number of times `submit_record` was invoked
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every record received, oldest first
    pub fn records(&self) -> Vec<FormFields> {
        self.records.lock().clone()
    }
}

impl SubmitTransport for MockTransport {
    async fn submit_record(&self, fields: &FormFields) -> Result<(), TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.records.lock().push(fields.clone());
        let outcome = self.script.lock().pop_front().unwrap_or(Ok(()));
        trace!(call, latency_ms = self.latency.as_millis() as u64, "mock transport call");

        tokio::time::sleep(self.latency).await;
        outcome
    }
}
