//! Admin sessions
//!
//! An [`AdminSession`] bundles one operator's navigation and reminder state.
//! Sessions live in a [`SessionRegistry`] keyed by UUID; each is behind a
//! `tokio::sync::Mutex` so a handler may await (cancel) while holding it.
//! Sessions nobody has touched for a while are closed by
//! [`spawn_idle_sweeper`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use shared::models::RunStatus;
use shared::{AppError, AppResult};

use crate::fixture::FixtureStore;
use crate::navigation::{NavParams, NavState, Navigator, Screen};
use crate::reminders::ReminderSession;

/// One operator's state
#[derive(Debug)]
pub struct AdminSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    navigator: Navigator,
    reminders: ReminderSession,
}

impl AdminSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            navigator: Navigator::new(),
            reminders: ReminderSession::new(),
        }
    }

    pub fn navigation(&self) -> &NavState {
        self.navigator.current()
    }

    pub fn reminders(&self) -> &ReminderSession {
        &self.reminders
    }

    pub fn reminders_mut(&mut self) -> &mut ReminderSession {
        &mut self.reminders
    }

    /// Move to `screen`, checking carried ids against the store
    ///
    /// Leaving Send Reminder cancels the run and discards the selection.
    /// Entering it with a group preselects that group.
    pub fn navigate(
        &mut self,
        store: &FixtureStore,
        screen: Screen,
        params: NavParams,
    ) -> AppResult<NavState> {
        let next = self.navigator.resolve(screen, params)?;

        if let Some(group_id) = next.params.group_id.as_deref()
            && (screen.requires_group() || screen == Screen::SendReminder)
            && store.find_group(group_id).is_none()
        {
            return Err(AppError::group_not_found(group_id));
        }
        if let Some(member_id) = next.params.member_id.as_deref()
            && screen.requires_member()
            && store.find_member(member_id).is_none()
        {
            return Err(AppError::member_not_found(member_id));
        }

        let leaving = self.navigator.current().screen == Screen::SendReminder
            && screen != Screen::SendReminder;
        if leaving {
            tracing::info!(session_id = %self.id, "Leaving Send Reminder, run discarded");
            self.reminders.reset();
        }

        self.navigator.navigate(next.screen, next.params.clone())?;

        if screen == Screen::SendReminder && next.params.group_id.is_some() {
            self.reminders
                .select_group(store, next.params.group_id.clone())?;
        }
        Ok(next)
    }

    /// Close Send Reminder: back to the group's member list, or the dashboard
    pub fn leave_reminders(&mut self, store: &FixtureStore) -> AppResult<NavState> {
        match self.reminders.selection().group_id.clone() {
            Some(group_id) => self.navigate(store, Screen::Members, NavParams::group(group_id)),
            None => self.navigate(store, Screen::Dashboard, NavParams::default()),
        }
    }

    /// Summary returned by the session endpoints
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            created_at: self.created_at,
            navigation: self.navigator.current().clone(),
            run_status: self.reminders.status(),
        }
    }
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub navigation: NavState,
    pub run_status: RunStatus,
}

pub type SessionHandle = Arc<Mutex<AdminSession>>;

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    /// 最近一次被请求访问的时间
    last_seen: Instant,
}

/// All open admin sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session
    pub fn create(&self) -> (Uuid, SessionHandle) {
        let session = AdminSession::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(
            id,
            SessionEntry {
                handle: Arc::clone(&handle),
                last_seen: Instant::now(),
            },
        );
        tracing::info!(session_id = %id, "Admin session opened");
        (id, handle)
    }

    /// Look up a session, marking it as recently used
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.handle)
        })
    }

    /// Look up a session or fail with `SessionNotFound`
    pub fn require(&self, id: &Uuid) -> AppResult<SessionHandle> {
        self.get(id).ok_or_else(|| {
            AppError::with_message(
                shared::ErrorCode::SessionNotFound,
                format!("Session {} not found", id),
            )
            .with_detail("session_id", id.to_string())
        })
    }

    /// Close a session, cancelling its run. Returns `false` if unknown.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let Some((_, entry)) = self.sessions.remove(id) else {
            return false;
        };
        let mut session = entry.handle.lock().await;
        session.reminders.cancel().await;
        session.reminders.reset();
        tracing::info!(session_id = %id, "Admin session closed");
        true
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Close every session untouched for at least `max_idle`
    ///
    /// A session that is locked by a request or still sending reminders is
    /// left open. Returns the number of sessions closed.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let idle: Vec<(Uuid, SessionHandle)> = self
            .sessions
            .iter()
            .filter(|entry| now.duration_since(entry.last_seen) >= max_idle)
            .map(|entry| (*entry.key(), Arc::clone(&entry.handle)))
            .collect();

        let mut closed = 0;
        for (id, handle) in idle {
            let busy = match handle.try_lock() {
                Ok(session) => session.reminders.status() == RunStatus::Running,
                Err(_) => true,
            };
            if busy {
                continue;
            }
            if self.remove(&id).await {
                tracing::info!(session_id = %id, idle_secs = max_idle.as_secs(), "Idle admin session expired");
                closed += 1;
            }
        }
        closed
    }
}

/// 定时清理空闲会话, 直到 `shutdown` 被取消
pub fn spawn_idle_sweeper(
    registry: Arc<SessionRegistry>,
    max_idle: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let period = (max_idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        tracing::info!(max_idle_secs = max_idle.as_secs(), "Session sweeper started");
        let mut sweep_interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::info!("Session sweeper stopped");
                    break;
                }
                _ = sweep_interval.tick() => {
                    registry.sweep_idle(max_idle).await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chit_sms::SimulatedGateway;
    use chrono::NaiveDate;
    use shared::ErrorCode;
    use shared::models::RunStatus;
    use tokio_util::sync::CancellationToken;

    use crate::reminders::Dispatcher;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn dispatcher(gateway: Arc<SimulatedGateway>) -> Dispatcher {
        Dispatcher::new(gateway, "CHITFD", Duration::from_millis(500), CancellationToken::new())
    }

    #[test]
    fn test_navigate_checks_ids() {
        let store = FixtureStore::embedded().unwrap();
        let mut session = AdminSession::new();
        let err = session
            .navigate(&store, Screen::Members, NavParams::group("g9"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GroupNotFound);

        let err = session
            .navigate(&store, Screen::EditMember, NavParams::member("m99"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotFound);
        assert_eq!(session.navigation().screen, Screen::Dashboard);
    }

    #[test]
    fn test_entering_send_reminder_preselects_group() {
        let store = FixtureStore::embedded().unwrap();
        let mut session = AdminSession::new();
        session
            .navigate(&store, Screen::SendReminder, NavParams::group("g2"))
            .unwrap();
        assert_eq!(session.reminders().selection().group_id.as_deref(), Some("g2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_send_reminder_stops_run() {
        let store = FixtureStore::embedded().unwrap();
        let gateway = Arc::new(SimulatedGateway::new());
        let dispatcher = dispatcher(gateway.clone());
        let mut session = AdminSession::new();
        session
            .navigate(&store, Screen::SendReminder, NavParams::group("g1"))
            .unwrap();
        session
            .reminders_mut()
            .dispatch(&store, &dispatcher, today())
            .unwrap();

        tokio::time::sleep(Duration::from_millis(750)).await;
        let state = session.leave_reminders(&store).unwrap();
        assert_eq!(state.screen, Screen::Members);
        assert_eq!(state.params.group_id.as_deref(), Some("g1"));
        assert_eq!(session.reminders().status(), RunStatus::Idle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(gateway.outbox().len(), 1);
    }

    #[test]
    fn test_leave_without_group_goes_to_dashboard() {
        let store = FixtureStore::embedded().unwrap();
        let mut session = AdminSession::new();
        session
            .navigate(&store, Screen::SendReminder, NavParams::default())
            .unwrap();
        let state = session.leave_reminders(&store).unwrap();
        assert_eq!(state.screen, Screen::Dashboard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_closes_only_idle_sessions() {
        let registry = SessionRegistry::new();
        let (stale, _) = registry.create();
        let (fresh, _) = registry.create();

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert!(registry.get(&fresh).is_some());
        tokio::time::sleep(Duration::from_secs(600)).await;

        assert_eq!(registry.sweep_idle(Duration::from_secs(900)).await, 1);
        assert!(registry.get(&stale).is_none());
        assert!(registry.get(&fresh).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_keeps_session_with_active_run() {
        let store = FixtureStore::embedded().unwrap();
        let gateway = Arc::new(SimulatedGateway::new());
        let dispatcher = Dispatcher::new(
            gateway.clone(),
            "CHITFD",
            Duration::from_secs(120),
            CancellationToken::new(),
        );
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create();
        {
            let mut session = handle.lock().await;
            session
                .navigate(&store, Screen::SendReminder, NavParams::group("g1"))
                .unwrap();
            session
                .reminders_mut()
                .dispatch(&store, &dispatcher, today())
                .unwrap();
        }

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(registry.sweep_idle(Duration::from_secs(30)).await, 0);
        assert_eq!(registry.len(), 1);

        // locked by an in-flight request
        let guard = handle.lock().await;
        assert_eq!(registry.sweep_idle(Duration::from_secs(30)).await, 0);
        drop(guard);

        handle.lock().await.reminders_mut().wait().await;
        assert_eq!(registry.sweep_idle(Duration::from_secs(30)).await, 1);
        assert!(registry.get(&id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sweeper_runs_until_shutdown() {
        let registry = Arc::new(SessionRegistry::new());
        registry.create();
        let shutdown = CancellationToken::new();
        let task = spawn_idle_sweeper(
            Arc::clone(&registry),
            Duration::from_secs(60),
            shutdown.clone(),
        );

        tokio::time::sleep(Duration::from_secs(90)).await;
        assert!(registry.is_empty());

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_registry_lifecycle() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create();
        assert_eq!(handle.lock().await.id, id);
        assert_eq!(registry.len(), 1);
        assert!(registry.require(&id).is_ok());

        assert!(registry.remove(&id).await);
        assert!(!registry.remove(&id).await);
        assert!(registry.is_empty());
        assert_eq!(
            registry.require(&id).unwrap_err().code,
            ErrorCode::SessionNotFound
        );
    }
}
