//! Fixture Store
//!
//! In-memory source of groups and members. Loaded once at start from the
//! embedded JSON fixture (or `FIXTURE_PATH`). Edits made through the
//! reminder-setup and member forms live only as long as the process.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;

use shared::models::{DashboardStats, Group, Member, MemberForm, ReminderSettingsUpdate};
use shared::{AppError, AppResult, ErrorCode};

use crate::reminders::selection::members_in_group;

const EMBEDDED_FIXTURE: &str = include_str!("../../fixtures/chit_fixture.json");

/// Fixture loading errors
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Member {member_id} references unknown group {group_id}")]
    UnknownGroup { member_id: String, group_id: String },

    #[error("Group {group_id} has due day {due_day}, expected 1-31")]
    InvalidDueDay { group_id: String, due_day: u8 },
}

impl From<FixtureError> for AppError {
    fn from(err: FixtureError) -> Self {
        AppError::with_message(ErrorCode::FixtureError, err.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FixtureData {
    groups: Vec<Group>,
    members: Vec<Member>,
}

impl FixtureData {
    fn check(&self) -> Result<(), FixtureError> {
        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(FixtureError::DuplicateId {
                    kind: "group",
                    id: group.id.clone(),
                });
            }
            if !(1..=31).contains(&group.due_day) {
                return Err(FixtureError::InvalidDueDay {
                    group_id: group.id.clone(),
                    due_day: group.due_day,
                });
            }
        }

        let mut member_ids = HashSet::new();
        for member in &self.members {
            if !member_ids.insert(member.id.as_str()) {
                return Err(FixtureError::DuplicateId {
                    kind: "member",
                    id: member.id.clone(),
                });
            }
            if !group_ids.contains(member.group_id.as_str()) {
                return Err(FixtureError::UnknownGroup {
                    member_id: member.id.clone(),
                    group_id: member.group_id.clone(),
                });
            }
        }
        Ok(())
    }

    fn next_member_id(&self) -> String {
        let max = self
            .members
            .iter()
            .filter_map(|m| m.id.strip_prefix('m')?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("m{}", max + 1)
    }
}

/// Shared handle to the fixture data (cheap to clone)
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    inner: Arc<RwLock<FixtureData>>,
}

impl FixtureStore {
    /// Parse and check a fixture document
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let data: FixtureData = serde_json::from_str(json)?;
        data.check()?;
        tracing::debug!(
            groups = data.groups.len(),
            members = data.members.len(),
            "Fixture loaded"
        );
        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
        })
    }

    /// The fixture compiled into the binary
    pub fn embedded() -> Result<Self, FixtureError> {
        Self::from_json(EMBEDDED_FIXTURE)
    }

    /// Load from `path` when given, otherwise the embedded fixture
    pub fn load(path: Option<&str>) -> Result<Self, FixtureError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
                    path: path.to_string(),
                    source,
                })?;
                tracing::info!(path = %path, "Loading fixture from file");
                Self::from_json(&json)
            }
            None => Self::embedded(),
        }
    }

    // ========== Read API ==========

    pub fn list_groups(&self) -> Vec<Group> {
        self.inner.read().groups.clone()
    }

    pub fn list_members(&self) -> Vec<Member> {
        self.inner.read().members.clone()
    }

    pub fn find_group(&self, id: &str) -> Option<Group> {
        self.inner.read().groups.iter().find(|g| g.id == id).cloned()
    }

    pub fn find_member(&self, id: &str) -> Option<Member> {
        self.inner.read().members.iter().find(|m| m.id == id).cloned()
    }

    /// Members of one group, in fixture order
    pub fn members_of(&self, group_id: &str) -> Vec<Member> {
        let data = self.inner.read();
        members_in_group(&data.members, group_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Groups whose name contains `query` (case-insensitive)
    pub fn search_groups(&self, query: &str) -> Vec<Group> {
        let query = query.trim().to_lowercase();
        self.inner
            .read()
            .groups
            .iter()
            .filter(|g| query.is_empty() || g.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardStats {
        let data = self.inner.read();
        DashboardStats::compute(&data.groups, &data.members, today)
    }

    // ========== In-memory edits ==========

    /// Apply a validated reminder-setup form to a group
    pub fn update_group_settings(
        &self,
        group_id: &str,
        update: &ReminderSettingsUpdate,
    ) -> AppResult<Group> {
        let mut data = self.inner.write();
        let group = data
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| AppError::group_not_found(group_id))?;
        update.apply_to(group);
        tracing::info!(group_id = %group_id, due_day = group.due_day, "Reminder settings updated");
        Ok(group.clone())
    }

    /// Add a member from a validated form
    pub fn create_member(&self, form: &MemberForm, today: NaiveDate) -> AppResult<Member> {
        let mut data = self.inner.write();
        if !data.groups.iter().any(|g| g.id == form.group_id.trim()) {
            return Err(AppError::group_not_found(form.group_id.trim()));
        }
        let id = data.next_member_id();
        let member = Member::from_form(id, form, today);
        data.members.push(member.clone());
        tracing::info!(member_id = %member.id, group_id = %member.group_id, "Member created");
        Ok(member)
    }

    /// Edit a member from a validated form (payment data is kept)
    pub fn update_member(
        &self,
        member_id: &str,
        form: &MemberForm,
        today: NaiveDate,
    ) -> AppResult<Member> {
        let mut data = self.inner.write();
        if !data.groups.iter().any(|g| g.id == form.group_id.trim()) {
            return Err(AppError::group_not_found(form.group_id.trim()));
        }
        let member = data
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| AppError::member_not_found(member_id))?;
        form.apply_to(member, today);
        tracing::info!(member_id = %member_id, "Member updated");
        Ok(member.clone())
    }
}
