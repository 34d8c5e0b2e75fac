//! Dispatch Sequencer
//!
//! A [`DispatchRun`] is the recipient snapshot of one "Send" press plus the
//! per-recipient outcome. The [`Dispatcher`] walks it strictly in snapshot
//! order on a spawned task: settle delay, cancellation check, delivery,
//! record. One recipient at a time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info};
use uuid::Uuid;

use chit_sms::SmsGateway;
use shared::models::RunStatus;

use super::delivery::{Delivered, DeliveryJob, deliver};
use super::error::ReminderError;

/// Run state shared between the sequencer task and readers
pub type SharedRun = Arc<Mutex<DispatchRun>>;

/// Outcome of one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Sent {
        number: String,
        via_alternate: bool,
        message_id: String,
        at: DateTime<Utc>,
    },
    Failed {
        attempted: Vec<String>,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl DeliveryStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// When the outcome was recorded
    pub fn at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Pending => None,
            Self::Sent { at, .. } | Self::Failed { at, .. } => Some(*at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientState {
    pub member_id: String,
    pub member_name: String,
    pub status: DeliveryStatus,
}

/// Snapshot of one dispatch and its progress
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRun {
    pub id: Uuid,
    pub group_id: String,
    pub status: RunStatus,
    pub recipients: Vec<RecipientState>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    jobs: Vec<DeliveryJob>,
}

impl DispatchRun {
    /// Freeze `jobs` as a new idle run
    pub fn new(group_id: impl Into<String>, jobs: Vec<DeliveryJob>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id: group_id.into(),
            status: RunStatus::Idle,
            recipients: jobs
                .iter()
                .map(|job| RecipientState {
                    member_id: job.member_id.clone(),
                    member_name: job.member_name.clone(),
                    status: DeliveryStatus::Pending,
                })
                .collect(),
            started_at: Utc::now(),
            finished_at: None,
            jobs,
        }
    }

    /// Whether `member_ids` (in order) is the snapshot this run was built from
    pub fn same_snapshot(&self, member_ids: &[&str]) -> bool {
        self.recipients.len() == member_ids.len()
            && self
                .recipients
                .iter()
                .zip(member_ids)
                .all(|(r, id)| r.member_id == *id)
    }

    pub fn sent_count(&self) -> usize {
        self.recipients.iter().filter(|r| r.status.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.recipients
            .iter()
            .filter(|r| matches!(r.status, DeliveryStatus::Failed { .. }))
            .count()
    }

    pub fn is_sent(&self, member_id: &str) -> bool {
        self.recipients
            .iter()
            .any(|r| r.member_id == member_id && r.status.is_sent())
    }

    /// Mark running and return the indices still to deliver
    ///
    /// Failed recipients go back to pending so a resumed run retries them.
    fn begin(&mut self) -> Vec<usize> {
        self.status = RunStatus::Running;
        self.finished_at = None;
        self.recipients
            .iter_mut()
            .enumerate()
            .filter(|(_, r)| !r.status.is_sent())
            .map(|(idx, r)| {
                r.status = DeliveryStatus::Pending;
                idx
            })
            .collect()
    }

    fn record(&mut self, idx: usize, result: Result<Delivered, ReminderError>) {
        let Some(recipient) = self.recipients.get_mut(idx) else {
            return;
        };
        let at = Utc::now();
        recipient.status = match result {
            Ok(delivered) => DeliveryStatus::Sent {
                number: delivered.number,
                via_alternate: delivered.via_alternate,
                message_id: delivered.receipt.message_id,
                at,
            },
            Err(ReminderError::DeliveryFailed {
                attempted, reason, ..
            }) => DeliveryStatus::Failed {
                attempted,
                reason,
                at,
            },
            Err(other) => DeliveryStatus::Failed {
                attempted: Vec::new(),
                reason: other.to_string(),
                at,
            },
        };
    }

    fn finish(&mut self) -> RunStatus {
        self.status = if self.recipients.iter().any(|r| r.status.is_pending()) {
            RunStatus::Cancelled
        } else if self.recipients.iter().all(|r| r.status.is_sent()) {
            RunStatus::Complete
        } else {
            RunStatus::PartiallySent
        };
        self.finished_at = Some(Utc::now());
        self.status
    }
}

/// Drives dispatch runs against one gateway
#[derive(Debug, Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn SmsGateway>,
    sender_id: String,
    settle_delay: Duration,
    shutdown: CancellationToken,
}

impl Dispatcher {
    /// `shutdown` is the parent of every run's cancellation token
    pub fn new(
        gateway: Arc<dyn SmsGateway>,
        sender_id: impl Into<String>,
        settle_delay: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            gateway,
            sender_id: sender_id.into(),
            settle_delay,
            shutdown,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Whether the SMS gateway is reachable
    pub async fn gateway_online(&self) -> bool {
        self.gateway.is_online().await
    }

    /// A fresh cancellation token for one run, cancelled on server shutdown
    pub fn run_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Start (or resume) `run`, delivering every recipient not yet sent
    ///
    /// The run is marked [`RunStatus::Running`] before this returns.
    pub fn start(&self, run: &SharedRun, cancel: CancellationToken) -> JoinHandle<()> {
        let (pending, run_id) = {
            let mut run = run.lock();
            (run.begin(), run.id)
        };
        let span = tracing::info_span!("reminder_run", %run_id, recipients = pending.len());
        let this = self.clone();
        let run = Arc::clone(run);
        tokio::spawn(this.drive(run, pending, cancel).instrument(span))
    }

    async fn drive(self, run: SharedRun, pending: Vec<usize>, cancel: CancellationToken) {
        info!("Reminder run started");

        for idx in pending {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settle_delay) => {}
            }

            let job = run.lock().jobs.get(idx).cloned();
            let Some(job) = job else {
                continue;
            };
            let result = deliver(self.gateway.as_ref(), &self.sender_id, &job).await;
            debug!(member_id = %job.member_id, ok = result.is_ok(), "Recipient processed");
            run.lock().record(idx, result);
        }

        let (status, sent, failed) = {
            let mut run = run.lock();
            let status = run.finish();
            (status, run.sent_count(), run.failed_count())
        };
        info!(status = ?status, sent, failed, "Reminder run finished");
    }
}
