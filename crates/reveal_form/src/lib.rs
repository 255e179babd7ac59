//! Reveal Form Handling
//!
//! Asynchronous form submission with a perceived-latency floor.
//!
//! - **Fields**: Ordered, required string fields
//! - **Transport**: The boundary a submission is delivered through, plus an
//!   in-process mock
//! - **Machine**: `Idle → Submitting → Success | IdleWithError` with an
//!   idempotent submit guard
//! - **Form**: The signup boundary that validates before submitting

pub mod fields;
pub mod form;
pub mod machine;
pub mod transport;

pub use fields::FormFields;
pub use form::SignupForm;
pub use machine::{
    FormEvent, SubmissionConfig, SubmissionMachine, SubmissionState, SubmitOutcome,
};
pub use transport::{MockTransport, SubmitTransport, TransportError};
