//! Unified error codes for the chit admin workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Group errors
//! - 2xxx: Member errors
//! - 3xxx: Reminder workflow errors
//! - 4xxx: Delivery errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on them
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Group ====================
    /// Group not found
    GroupNotFound = 1001,
    /// Due day outside 1..=31
    InvalidDueDay = 1002,
    /// Message template is empty or uses unknown placeholders
    InvalidTemplate = 1003,

    // ==================== 2xxx: Member ====================
    /// Member not found
    MemberNotFound = 2001,
    /// Phone number is not a valid mobile number
    InvalidPhoneNumber = 2003,
    /// Member does not belong to the requested group
    MemberGroupMismatch = 2004,

    // ==================== 3xxx: Reminder ====================
    /// Dispatch attempted without a target group
    NoGroupSelected = 3001,
    /// Dispatch attempted with zero resolved recipients
    EmptyRecipientSet = 3002,
    /// A dispatch run is already in progress
    RunAlreadyActive = 3003,
    /// Chosen member no longer resolves in the current group
    StaleSelection = 3004,
    /// Admin session not found
    SessionNotFound = 3005,

    // ==================== 4xxx: Delivery ====================
    /// SMS could not be delivered to any number
    DeliveryFailed = 4001,
    /// SMS gateway is unavailable
    GatewayUnavailable = 4002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Fixture data could not be loaded
    FixtureError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Group
            ErrorCode::GroupNotFound => "Group not found",
            ErrorCode::InvalidDueDay => "Due day must be between 1 and 31",
            ErrorCode::InvalidTemplate => "Message template is invalid",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::InvalidPhoneNumber => "Invalid mobile number",
            ErrorCode::MemberGroupMismatch => "Member does not belong to this group",

            // Reminder
            ErrorCode::NoGroupSelected => "Please select a group",
            ErrorCode::EmptyRecipientSet => {
                "Please select at least one member to send reminders"
            }
            ErrorCode::RunAlreadyActive => "Reminders are already being sent",
            ErrorCode::StaleSelection => "Selected member is not in the current group",
            ErrorCode::SessionNotFound => "Session not found",

            // Delivery
            ErrorCode::DeliveryFailed => "Reminder could not be delivered",
            ErrorCode::GatewayUnavailable => "SMS gateway is unavailable",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::FixtureError => "Fixture data could not be loaded",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Group
            1001 => Ok(ErrorCode::GroupNotFound),
            1002 => Ok(ErrorCode::InvalidDueDay),
            1003 => Ok(ErrorCode::InvalidTemplate),

            // Member
            2001 => Ok(ErrorCode::MemberNotFound),
            2003 => Ok(ErrorCode::InvalidPhoneNumber),
            2004 => Ok(ErrorCode::MemberGroupMismatch),

            // Reminder
            3001 => Ok(ErrorCode::NoGroupSelected),
            3002 => Ok(ErrorCode::EmptyRecipientSet),
            3003 => Ok(ErrorCode::RunAlreadyActive),
            3004 => Ok(ErrorCode::StaleSelection),
            3005 => Ok(ErrorCode::SessionNotFound),

            // Delivery
            4001 => Ok(ErrorCode::DeliveryFailed),
            4002 => Ok(ErrorCode::GatewayUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::FixtureError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
