//! Error types for the SMS library

use thiserror::Error;

/// SMS gateway error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmsError {
    /// Destination number rejected before sending
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Handset unreachable / carrier reported non-delivery
    #[error("Undeliverable: {0}")]
    Undeliverable(String),

    /// Gateway refused the message (quota, DND registry, content filter)
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Gateway did not answer in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Gateway is offline or unreachable
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

impl SmsError {
    /// Failures that would hit every number equally; retrying the same
    /// recipient on another number cannot help.
    pub fn is_gateway_wide(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type for SMS operations
pub type SmsResult<T> = Result<T, SmsError>;
