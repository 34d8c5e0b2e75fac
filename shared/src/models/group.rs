//! Group Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, ErrorCode};
use crate::util::format_inr;
use crate::validation::{MAX_PLACE_LEN, MAX_TEMPLATE_LEN, validate_not_blank, validate_template};

/// Chit group entity (a rotating-savings circle)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Monthly contribution in whole rupees
    pub amount: u64,
    /// Declared roster size
    pub total_members: u32,
    /// Day of month the contribution is due (1-31)
    pub due_day: u8,
    pub place: String,
    pub message_template: String,
}

/// Row in the group listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub amount: u64,
    pub amount_display: String,
    pub total_members: u32,
}

impl From<&Group> for GroupSummary {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            amount: group.amount,
            amount_display: format_inr(group.amount),
            total_members: group.total_members,
        }
    }
}

/// Reminder setup edit payload
///
/// Only the reminder-related fields of a group are editable.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReminderSettingsUpdate {
    #[validate(range(min = 1, max = 31, message = "due day must be between 1 and 31"))]
    pub due_day: u8,
    #[validate(
        length(max = MAX_PLACE_LEN),
        custom(function = "validate_not_blank")
    )]
    pub place: String,
    #[validate(
        length(max = MAX_TEMPLATE_LEN),
        custom(function = "validate_template")
    )]
    pub message_template: String,
}

impl ReminderSettingsUpdate {
    /// Validate, reporting a lone due-day or template failure with its own code
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            AppError::from(errors).narrow_validation(&[
                ("due_day", ErrorCode::InvalidDueDay),
                ("message_template", ErrorCode::InvalidTemplate),
            ])
        })
    }

    /// Prefill the edit form from the current group.
    pub fn from_group(group: &Group) -> Self {
        Self {
            due_day: group.due_day,
            place: group.place.clone(),
            message_template: group.message_template.clone(),
        }
    }

    pub fn apply_to(&self, group: &mut Group) {
        group.due_day = self.due_day;
        group.place = self.place.trim().to_string();
        group.message_template = self.message_template.clone();
    }
}
