//! Reminder workflow wire types

use serde::{Deserialize, Serialize};

/// Which members of the selected group receive a reminder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Every member of the group
    #[default]
    All,
    /// Exactly one chosen member
    Single,
    /// Any number of chosen members
    Multi,
}

impl SelectionMode {
    /// Whether the admin picks recipients by hand in this mode
    pub fn is_manual(&self) -> bool {
        !matches!(self, Self::All)
    }
}

/// Lifecycle of a dispatch run
///
/// `Idle -> Running -> {Complete | PartiallySent | Cancelled}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    /// Every recipient marked sent
    Complete,
    /// Every recipient processed, at least one delivery failed
    PartiallySent,
    /// Stopped before every recipient was processed
    Cancelled,
}

impl RunStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// A finished run that can be resumed for the recipients it did not reach
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::PartiallySent | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_mode_serde() {
        assert_eq!(serde_json::to_string(&SelectionMode::Multi).unwrap(), "\"multi\"");
        let mode: SelectionMode = serde_json::from_str("\"single\"").unwrap();
        assert_eq!(mode, SelectionMode::Single);
        assert!(serde_json::from_str::<SelectionMode>("\"some\"").is_err());
    }

    #[test]
    fn test_run_status_predicates() {
        assert!(RunStatus::Running.is_running());
        assert!(!RunStatus::Complete.is_resumable());
        assert!(RunStatus::Cancelled.is_resumable());
        assert!(RunStatus::PartiallySent.is_resumable());
        assert_eq!(
            serde_json::to_string(&RunStatus::PartiallySent).unwrap(),
            "\"partially_sent\""
        );
    }
}
