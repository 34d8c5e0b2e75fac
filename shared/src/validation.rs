//! Input validation helpers
//!
//! Text length limits and the custom rules plugged into `#[derive(Validate)]`
//! on the form payloads in [`crate::models`].

use std::borrow::Cow;

use validator::ValidationError;

use crate::template;

// ── Text length limits ──────────────────────────────────────────────

/// Member and group names
pub const MAX_NAME_LEN: u64 = 100;

/// Meeting place
pub const MAX_PLACE_LEN: u64 = 200;

/// Member notes
pub const MAX_NOTE_LEN: u64 = 500;

/// Reminder message template (several SMS segments at most)
pub const MAX_TEMPLATE_LEN: u64 = 640;

// ── Mobile numbers ──────────────────────────────────────────────────

/// Normalize an Indian mobile number to its 10 significant digits.
///
/// Spaces and dashes are ignored; a leading `+91`, `91` or `0` is stripped.
/// Returns `None` unless the result is ten digits starting with 6-9.
pub fn normalize_mobile(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let national = match digits.len() {
        10 => digits,
        11 => digits.strip_prefix('0')?,
        12 => digits.strip_prefix("91")?,
        _ => return None,
    };

    match national.as_bytes().first() {
        Some(b'6'..=b'9') => Some(national.to_string()),
        _ => None,
    }
}

/// `validator` custom rule for mobile numbers.
pub fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    if normalize_mobile(value).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("mobile");
    err.message = Some(Cow::Borrowed("must be a 10-digit mobile number"));
    Err(err)
}

/// `validator` custom rule rejecting blank (whitespace-only) text.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be empty"));
        return Err(err);
    }
    Ok(())
}

/// `validator` custom rule for reminder templates: non-blank and only known
/// placeholders.
pub fn validate_template(value: &str) -> Result<(), ValidationError> {
    validate_not_blank(value)?;
    let unknown = template::unknown_placeholders(value);
    if unknown.is_empty() {
        return Ok(());
    }
    let mut err = ValidationError::new("placeholder");
    err.message = Some(Cow::Owned(format!(
        "unknown placeholder(s): {}",
        unknown.join(", ")
    )));
    Err(err)
}
