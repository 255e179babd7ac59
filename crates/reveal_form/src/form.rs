//! Signup form boundary
//!
//! Enforces required fields before anything reaches the submission machine.

use reveal_core::RevealResult;
use tokio::sync::watch;

use crate::fields::FormFields;
use crate::machine::{SubmissionConfig, SubmissionMachine, SubmissionState, SubmitOutcome};
use crate::transport::SubmitTransport;

/// Newsletter signup form: name, email and travel interest
pub struct SignupForm<T> {
    machine: SubmissionMachine<T>,
}

impl<T: SubmitTransport> SignupForm<T> {
    pub fn new(transport: T, config: SubmissionConfig) -> Self {
        Self::with_fields(FormFields::signup(), transport, config)
    }

    pub fn with_fields(fields: FormFields, transport: T, config: SubmissionConfig) -> Self {
        Self {
            machine: SubmissionMachine::new(fields, transport, config),
        }
    }

    pub fn machine(&self) -> &SubmissionMachine<T> {
        &self.machine
    }

    pub fn set_field(&self, name: &str, value: impl Into<String>) -> bool {
        self.machine.set_field(name, value)
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.machine.fields().get(name).map(str::to_owned)
    }

    pub fn state(&self) -> SubmissionState {
        self.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.machine.subscribe()
    }

    /// Validate and submit
    ///
    /// Returns `Ignored` without validating when the machine would refuse the
    /// submit anyway, and `InvalidFieldState` for the first blank field.
    pub async fn submit(&self) -> RevealResult<SubmitOutcome> {
        if !self.machine.state().accepts_submit() {
            return Ok(SubmitOutcome::Ignored);
        }
        self.machine.fields().validate()?;
        Ok(self.machine.submit().await)
    }
}
