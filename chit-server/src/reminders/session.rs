//! Reminder session
//!
//! The Send Reminder screen's state for one admin: the selection and at most
//! one dispatch run. Group and member data are always read fresh from the
//! [`FixtureStore`]; only the run snapshot is frozen.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use shared::models::{Group, GroupSummary, Member, RunStatus, SelectionMode};

use super::delivery::DeliveryJob;
use super::dispatch::{DispatchRun, Dispatcher, SharedRun};
use super::error::ReminderError;
use super::selection::SelectionState;
use crate::fixture::FixtureStore;

/// What a dispatch request did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Started { run_id: Uuid, recipients: usize },
    Resumed { run_id: Uuid, remaining: usize },
    AlreadyComplete { run_id: Uuid },
}

#[derive(Debug)]
struct ActiveRun {
    run: SharedRun,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ActiveRun {
    fn status(&self) -> RunStatus {
        self.run.lock().status
    }

    fn discard(self) {
        self.cancel.cancel();
    }
}

/// Selection plus the current run
#[derive(Debug, Default)]
pub struct ReminderSession {
    selection: SelectionState,
    active: Option<ActiveRun>,
}

impl ReminderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current run status, `Idle` when there is no run
    pub fn status(&self) -> RunStatus {
        self.active
            .as_ref()
            .map(ActiveRun::status)
            .unwrap_or_default()
    }

    /// Copy of the current run, if any
    pub fn run(&self) -> Option<DispatchRun> {
        self.active.as_ref().map(|a| a.run.lock().clone())
    }

    /// Switch group; a real switch cancels and discards any run
    pub fn select_group(
        &mut self,
        store: &FixtureStore,
        group_id: Option<String>,
    ) -> Result<(), ReminderError> {
        if let Some(id) = group_id.as_deref()
            && store.find_group(id).is_none()
        {
            return Err(ReminderError::UnknownGroup(id.to_string()));
        }
        if self.selection.select_group(group_id) {
            self.reset_run();
        }
        Ok(())
    }

    /// Switch mode; a real switch cancels and discards any run
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.selection.set_mode(mode) {
            self.reset_run();
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.selection.set_query(query);
    }

    pub fn toggle(&mut self, store: &FixtureStore, member_id: &str) -> Result<(), ReminderError> {
        let members = self.group_members(store);
        self.selection.toggle(member_id, &members)
    }

    pub fn toggle_all(&mut self, store: &FixtureStore) -> Result<(), ReminderError> {
        if self.selection.group_id.is_none() {
            return Err(ReminderError::NoGroupSelected);
        }
        let members = self.group_members(store);
        self.selection.toggle_all(&members);
        Ok(())
    }

    /// Start, resume or no-op, depending on the current run
    ///
    /// Preconditions are checked before anything changes: a group is
    /// selected, the recipient set is non-empty, no run is in progress.
    pub fn dispatch(
        &mut self,
        store: &FixtureStore,
        dispatcher: &Dispatcher,
        today: NaiveDate,
    ) -> Result<DispatchOutcome, ReminderError> {
        let group = self.current_group(store)?;
        let members = store.members_of(&group.id);
        let recipients = self.selection.recipients(&members);
        if recipients.is_empty() {
            return Err(ReminderError::EmptyRecipientSet);
        }

        if let Some(active) = &mut self.active {
            let (status, same, run_id) = {
                let run = active.run.lock();
                let ids: Vec<&str> = recipients.iter().map(|m| m.id.as_str()).collect();
                (run.status, run.same_snapshot(&ids), run.id)
            };
            if status.is_running() {
                return Err(ReminderError::RunAlreadyActive);
            }
            if same && status == RunStatus::Complete {
                tracing::debug!(run_id = %run_id, "Dispatch skipped, run already complete");
                return Ok(DispatchOutcome::AlreadyComplete { run_id });
            }
            if same && status.is_resumable() {
                let remaining = recipients.len() - active.run.lock().sent_count();
                active.cancel = dispatcher.run_token();
                active.task = Some(dispatcher.start(&active.run, active.cancel.clone()));
                tracing::info!(run_id = %run_id, remaining, "Reminder run resumed");
                return Ok(DispatchOutcome::Resumed { run_id, remaining });
            }
        }

        let jobs: Vec<DeliveryJob> = recipients
            .iter()
            .map(|m| DeliveryJob::new(&group, m, today))
            .collect();
        let run: SharedRun = Arc::new(Mutex::new(DispatchRun::new(group.id.clone(), jobs)));
        let run_id = run.lock().id;
        let cancel = dispatcher.run_token();
        let task = dispatcher.start(&run, cancel.clone());

        if let Some(previous) = self.active.replace(ActiveRun {
            run,
            cancel,
            task: Some(task),
        }) {
            previous.discard();
        }

        tracing::info!(
            run_id = %run_id,
            group_id = %group.id,
            recipients = recipients.len(),
            "Reminder run started"
        );
        Ok(DispatchOutcome::Started {
            run_id,
            recipients: recipients.len(),
        })
    }

    /// Cancel the in-flight run and wait for it to stop
    ///
    /// Returns `false` when nothing was running.
    pub async fn cancel(&mut self) -> bool {
        let Some(active) = &mut self.active else {
            return false;
        };
        if !active.status().is_running() {
            return false;
        }
        active.cancel.cancel();
        if let Some(task) = active.task.take()
            && let Err(err) = task.await
        {
            tracing::error!(error = %err, "Reminder run task failed");
        }
        true
    }

    /// Wait for the current run task to finish on its own
    pub async fn wait(&mut self) {
        if let Some(task) = self.active.as_mut().and_then(|a| a.task.take())
            && let Err(err) = task.await
        {
            tracing::error!(error = %err, "Reminder run task failed");
        }
    }

    /// Drop the run and the selection (leaving the screen)
    pub fn reset(&mut self) {
        self.reset_run();
        self.selection = SelectionState::default();
    }

    fn reset_run(&mut self) {
        if let Some(active) = self.active.take() {
            active.discard();
        }
    }

    fn current_group(&self, store: &FixtureStore) -> Result<Group, ReminderError> {
        let group_id = self
            .selection
            .group_id
            .as_deref()
            .ok_or(ReminderError::NoGroupSelected)?;
        store
            .find_group(group_id)
            .ok_or_else(|| ReminderError::UnknownGroup(group_id.to_string()))
    }

    fn group_members(&self, store: &FixtureStore) -> Vec<Member> {
        self.selection
            .group_id
            .as_deref()
            .map(|id| store.members_of(id))
            .unwrap_or_default()
    }

    /// Everything the Send Reminder screen shows
    pub fn view(&self, store: &FixtureStore) -> ReminderView {
        let group = self
            .selection
            .group_id
            .as_deref()
            .and_then(|id| store.find_group(id));
        let members = self.group_members(store);
        let run = self.run();

        let visible = self.selection.visible(&members);
        let rows = visible
            .iter()
            .map(|m| SelectableMember {
                id: m.id.clone(),
                name: m.name.clone(),
                primary_phone: m.primary_phone.clone(),
                alternate_phone: m.alternate_phone.clone(),
                checked: self.selection.mode == SelectionMode::All
                    || self.selection.chosen.contains(&m.id),
                sent: run.as_ref().is_some_and(|r| r.is_sent(&m.id)),
            })
            .collect::<Vec<_>>();

        let all_visible_chosen = !visible.is_empty()
            && visible.iter().all(|m| self.selection.chosen.contains(&m.id));

        ReminderView {
            group: group.as_ref().map(GroupSummary::from),
            mode: self.selection.mode,
            query: self.selection.query.clone(),
            chosen: self.selection.chosen.iter().cloned().collect(),
            found: rows.len(),
            total: members.len(),
            recipient_count: self.selection.recipients(&members).len(),
            all_visible_chosen,
            status: run.as_ref().map(|r| r.status).unwrap_or_default(),
            members: rows,
            run,
        }
    }
}

/// One row of the selection list
#[derive(Debug, Clone, Serialize)]
pub struct SelectableMember {
    pub id: String,
    pub name: String,
    pub primary_phone: String,
    pub alternate_phone: Option<String>,
    pub checked: bool,
    pub sent: bool,
}

/// The Send Reminder screen
#[derive(Debug, Clone, Serialize)]
pub struct ReminderView {
    pub group: Option<GroupSummary>,
    pub mode: SelectionMode,
    pub query: String,
    pub chosen: Vec<String>,
    pub members: Vec<SelectableMember>,
    /// "Found X of Y"
    pub found: usize,
    pub total: usize,
    pub recipient_count: usize,
    pub all_visible_chosen: bool,
    pub status: RunStatus,
    pub run: Option<DispatchRun>,
}
