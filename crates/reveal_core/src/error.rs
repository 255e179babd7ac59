//! Error taxonomy shared by every Reveal crate
//!
//! None of these are fatal to a page. Each one is scoped to the section or form
//! instance that produced it.

use thiserror::Error;

use crate::visibility::RegionId;

pub type RevealResult<T> = Result<T, RevealError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RevealError {
    /// The region could not be measured (detached, zero-sized, not laid out).
    /// Observers treat this as "not visible" and never surface it.
    #[error("region {region:?} cannot be measured")]
    ObservationUnavailable { region: RegionId },

    /// The submission transport failed. The message is shown to the user.
    #[error("{0}")]
    SubmissionTransport(String),

    /// A required form field was empty when submit was requested.
    #[error("required field `{field}` is empty")]
    InvalidFieldState { field: String },

    /// Visibility thresholds must lie in (0, 1].
    #[error("visibility threshold {0} is outside (0, 1]")]
    InvalidThreshold(f32),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RevealError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::SubmissionTransport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::InvalidFieldState {
            field: field.into(),
        }
    }

    /// Errors that the UI should display to the user verbatim
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::SubmissionTransport(_) | Self::InvalidFieldState { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_is_displayed_verbatim() {
        let err = RevealError::transport("network error");
        assert_eq!(err.to_string(), "network error");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_field_and_threshold_messages() {
        assert_eq!(
            RevealError::missing_field("email").to_string(),
            "required field `email` is empty"
        );
        assert!(RevealError::InvalidThreshold(1.5)
            .to_string()
            .contains("outside (0, 1]"));
        assert!(!RevealError::config("bad").is_user_facing());
    }
}
