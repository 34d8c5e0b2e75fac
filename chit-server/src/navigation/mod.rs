//! Navigation State
//!
//! One [`Navigator`] per admin session. The active screen and the carried
//! `group_id` / `member_id` change only through [`Navigator::navigate`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::{AppError, ErrorCode};

/// Admin screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Dashboard,
    Groups,
    Members,
    AddMember,
    EditMember,
    ReminderSetup,
    SendReminder,
}

impl Screen {
    /// Screens that make no sense without a group
    pub fn requires_group(&self) -> bool {
        matches!(self, Self::Members | Self::ReminderSetup)
    }

    /// Screens that make no sense without a member
    pub fn requires_member(&self) -> bool {
        matches!(self, Self::EditMember)
    }
}

/// Parameters carried between screens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavParams {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub member_id: Option<String>,
}

impl NavParams {
    pub fn group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            member_id: None,
        }
    }

    pub fn member(member_id: impl Into<String>) -> Self {
        Self {
            group_id: None,
            member_id: Some(member_id.into()),
        }
    }
}

/// Where the admin currently is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub screen: Screen,
    pub params: NavParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Screen {0:?} needs a group")]
    MissingGroup(Screen),

    #[error("Screen {0:?} needs a member")]
    MissingMember(Screen),
}

impl From<NavigationError> for AppError {
    fn from(err: NavigationError) -> Self {
        let field = match err {
            NavigationError::MissingGroup(_) => "group_id",
            NavigationError::MissingMember(_) => "member_id",
        };
        AppError::with_message(ErrorCode::RequiredField, err.to_string()).with_detail("field", field)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: NavState,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &NavState {
        &self.state
    }

    /// The state `navigate` would produce, without committing it
    ///
    /// Params that are not given keep their previous value.
    pub fn resolve(&self, screen: Screen, params: NavParams) -> Result<NavState, NavigationError> {
        let params = NavParams {
            group_id: params.group_id.or_else(|| self.state.params.group_id.clone()),
            member_id: params.member_id.or_else(|| self.state.params.member_id.clone()),
        };
        if screen.requires_group() && params.group_id.is_none() {
            return Err(NavigationError::MissingGroup(screen));
        }
        if screen.requires_member() && params.member_id.is_none() {
            return Err(NavigationError::MissingMember(screen));
        }
        Ok(NavState { screen, params })
    }

    /// Move to `screen`
    pub fn navigate(&mut self, screen: Screen, params: NavParams) -> Result<&NavState, NavigationError> {
        let next = self.resolve(screen, params)?;
        tracing::debug!(from = ?self.state.screen, to = ?next.screen, "Navigate");
        self.state = next;
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_dashboard() {
        let nav = Navigator::new();
        assert_eq!(nav.current().screen, Screen::Dashboard);
        assert_eq!(nav.current().params, NavParams::default());
    }

    #[test]
    fn test_params_carry_over_when_absent() {
        let mut nav = Navigator::new();
        nav.navigate(Screen::Members, NavParams::group("g1")).unwrap();
        nav.navigate(Screen::EditMember, NavParams::member("m2")).unwrap();
        let state = nav.navigate(Screen::Members, NavParams::default()).unwrap();
        assert_eq!(state.params.group_id.as_deref(), Some("g1"));
        assert_eq!(state.params.member_id.as_deref(), Some("m2"));
    }

    #[test]
    fn test_missing_params_rejected_without_change() {
        let mut nav = Navigator::new();
        assert_eq!(
            nav.navigate(Screen::Members, NavParams::default()),
            Err(NavigationError::MissingGroup(Screen::Members))
        );
        assert_eq!(
            nav.navigate(Screen::EditMember, NavParams::group("g1")),
            Err(NavigationError::MissingMember(Screen::EditMember))
        );
        assert_eq!(nav.current().screen, Screen::Dashboard);
    }

    #[test]
    fn test_send_reminder_without_group_allowed() {
        let mut nav = Navigator::new();
        assert!(nav.navigate(Screen::SendReminder, NavParams::default()).is_ok());
    }

    #[test]
    fn test_screen_serde() {
        let json = serde_json::to_string(&Screen::ReminderSetup).unwrap();
        assert_eq!(json, "\"reminder_setup\"");
        let err: AppError = NavigationError::MissingGroup(Screen::Members).into();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }
}
