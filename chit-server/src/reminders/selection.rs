//! Selection Engine
//!
//! Pure functions deciding who receives a reminder, plus the per-session
//! [`SelectionState`] that the toggle / select-all / switch operations mutate.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use shared::models::{Member, SelectionMode};

use super::error::ReminderError;

/// Members of `group_id`, in fixture order
pub fn members_in_group<'a, I>(members: I, group_id: &str) -> Vec<&'a Member>
where
    I: IntoIterator<Item = &'a Member>,
{
    members
        .into_iter()
        .filter(|m| m.group_id == group_id)
        .collect()
}

/// Case-insensitive substring filter over name, primary and alternate phone
///
/// A blank query returns every member. Input order is preserved.
pub fn apply_search<'a, I>(members: I, query: &str) -> Vec<&'a Member>
where
    I: IntoIterator<Item = &'a Member>,
{
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return members.into_iter().collect();
    }
    members
        .into_iter()
        .filter(|m| matches_query(m, &query))
        .collect()
}

fn matches_query(member: &Member, query: &str) -> bool {
    member.name.to_lowercase().contains(query)
        || member.primary_phone.contains(query)
        || member
            .alternate_phone
            .as_deref()
            .is_some_and(|alt| alt.contains(query))
}

/// Resolve the recipients for `mode`
///
/// Under `all` the whole group is returned in group order, whatever was
/// chosen. Otherwise recipients follow the order they were chosen in, and
/// chosen ids no longer in the group are dropped.
pub fn recipients<'a, I>(
    mode: SelectionMode,
    group_members: I,
    chosen: &IndexSet<String>,
) -> Vec<&'a Member>
where
    I: IntoIterator<Item = &'a Member>,
{
    let group: Vec<&Member> = group_members.into_iter().collect();
    match mode {
        SelectionMode::All => group,
        SelectionMode::Single | SelectionMode::Multi => chosen
            .iter()
            .filter_map(|id| group.iter().find(|m| m.id == *id).copied())
            .collect(),
    }
}

/// What the admin has picked on the Send Reminder screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub group_id: Option<String>,
    pub mode: SelectionMode,
    /// Chosen member ids, in the order they were picked
    pub chosen: IndexSet<String>,
    pub query: String,
}

impl SelectionState {
    /// Switch the target group. Returns `true` when the group changed.
    ///
    /// A switch clears the chosen set and the search query.
    pub fn select_group(&mut self, group_id: Option<String>) -> bool {
        if self.group_id == group_id {
            return false;
        }
        self.group_id = group_id;
        self.chosen.clear();
        self.query.clear();
        true
    }

    /// Switch the selection mode. Returns `true` when the mode changed.
    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.chosen.clear();
        true
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Flip one member in or out of the chosen set
    ///
    /// `single` replaces the set with exactly this member, so toggling the
    /// current choice keeps it. No-op under `all`.
    pub fn toggle(&mut self, member_id: &str, group_members: &[Member]) -> Result<(), ReminderError> {
        if self.group_id.is_none() {
            return Err(ReminderError::NoGroupSelected);
        }
        if !group_members.iter().any(|m| m.id == member_id) {
            return Err(ReminderError::StaleSelection(member_id.to_string()));
        }

        match self.mode {
            SelectionMode::All => {}
            SelectionMode::Single => {
                self.chosen.clear();
                self.chosen.insert(member_id.to_string());
            }
            SelectionMode::Multi => {
                if !self.chosen.shift_remove(member_id) {
                    self.chosen.insert(member_id.to_string());
                }
            }
        }
        Ok(())
    }

    /// Select every filtered member, or clear if they are all already chosen
    ///
    /// Under `single` only a one-member list can be selected; any other list
    /// just deselects.
    pub fn toggle_all(&mut self, group_members: &[Member]) {
        if self.mode == SelectionMode::All {
            return;
        }
        let filtered: IndexSet<String> = apply_search(group_members, &self.query)
            .into_iter()
            .map(|m| m.id.clone())
            .collect();
        let selectable = match self.mode {
            SelectionMode::Single => filtered.len() == 1,
            _ => true,
        };
        if !selectable || self.chosen == filtered {
            self.chosen.clear();
        } else {
            self.chosen = filtered;
        }
    }

    /// Recipients for the current mode and chosen set
    pub fn recipients<'a>(&self, group_members: &'a [Member]) -> Vec<&'a Member> {
        recipients(self.mode, group_members, &self.chosen)
    }

    /// The members shown in the selection list
    pub fn visible<'a>(&self, group_members: &'a [Member]) -> Vec<&'a Member> {
        apply_search(group_members, &self.query)
    }
}
