use thiserror::Error;

use shared::{AppError, ErrorCode};

/// Errors raised by the reminder workflow
///
/// All of them are recoverable: the session stays usable after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error("No group selected")]
    NoGroupSelected,

    #[error("Group {0} no longer exists")]
    UnknownGroup(String),

    #[error("No recipients selected")]
    EmptyRecipientSet,

    #[error("A reminder run is already in progress")]
    RunAlreadyActive,

    #[error("Member {0} is not in the selected group")]
    StaleSelection(String),

    #[error("Delivery to member {member_id} failed on {attempted:?}: {reason}")]
    DeliveryFailed {
        member_id: String,
        attempted: Vec<String>,
        reason: String,
    },
}

impl From<ReminderError> for AppError {
    fn from(err: ReminderError) -> Self {
        let message = err.to_string();
        match err {
            ReminderError::NoGroupSelected => {
                AppError::with_message(ErrorCode::NoGroupSelected, message)
            }
            ReminderError::UnknownGroup(id) => AppError::group_not_found(&id),
            ReminderError::EmptyRecipientSet => {
                AppError::with_message(ErrorCode::EmptyRecipientSet, message)
            }
            ReminderError::RunAlreadyActive => {
                AppError::with_message(ErrorCode::RunAlreadyActive, message)
            }
            ReminderError::StaleSelection(member_id) => {
                AppError::with_message(ErrorCode::StaleSelection, message)
                    .with_detail("member_id", member_id)
            }
            ReminderError::DeliveryFailed {
                member_id,
                attempted,
                ..
            } => AppError::with_message(ErrorCode::DeliveryFailed, message)
                .with_detail("member_id", member_id)
                .with_detail("attempted", attempted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_maps_to_error_codes() {
        let err: AppError = ReminderError::RunAlreadyActive.into();
        assert_eq!(err.code, ErrorCode::RunAlreadyActive);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError = ReminderError::NoGroupSelected.into();
        assert_eq!(err.http_status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: AppError = ReminderError::UnknownGroup("g9".into()).into();
        assert_eq!(err.code, ErrorCode::GroupNotFound);
    }

    #[test]
    fn test_stale_selection_carries_member_id() {
        let err: AppError = ReminderError::StaleSelection("m9".into()).into();
        let details = err.details.unwrap();
        assert_eq!(details["member_id"], "m9");
    }

    #[test]
    fn test_delivery_failed_lists_numbers() {
        let err: AppError = ReminderError::DeliveryFailed {
            member_id: "m1".into(),
            attempted: vec!["9876543210".into(), "9840011122".into()],
            reason: "undeliverable".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::DeliveryFailed);
        assert_eq!(err.details.unwrap()["attempted"][1], "9840011122");
    }
}
