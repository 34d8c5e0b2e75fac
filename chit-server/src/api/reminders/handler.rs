//! Send Reminder API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ServerState;
use crate::navigation::NavState;
use crate::reminders::{DispatchOutcome, ReminderView};
use shared::AppResult;
use shared::models::SelectionMode;
use shared::util::today;

/// GET /api/sessions/:id/reminders
pub async fn view(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReminderView>> {
    let handle = state.sessions.require(&id)?;
    let session = handle.lock().await;
    Ok(Json(session.reminders().view(&state.store)))
}

#[derive(Debug, Deserialize)]
pub struct SelectGroupRequest {
    pub group_id: Option<String>,
}

/// PUT /api/sessions/:id/reminders/group
pub async fn select_group(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectGroupRequest>,
) -> AppResult<Json<ReminderView>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    let group_id = payload.group_id.filter(|g| !g.trim().is_empty());
    session
        .reminders_mut()
        .select_group(&state.store, group_id)?;
    Ok(Json(session.reminders().view(&state.store)))
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: SelectionMode,
}

/// PUT /api/sessions/:id/reminders/mode
pub async fn set_mode(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModeRequest>,
) -> AppResult<Json<ReminderView>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    session.reminders_mut().set_mode(payload.mode);
    Ok(Json(session.reminders().view(&state.store)))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// PUT /api/sessions/:id/reminders/search
pub async fn set_query(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SearchRequest>,
) -> AppResult<Json<ReminderView>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    session.reminders_mut().set_query(payload.query);
    Ok(Json(session.reminders().view(&state.store)))
}

/// POST /api/sessions/:id/reminders/toggle/:member_id
pub async fn toggle(
    State(state): State<ServerState>,
    Path((id, member_id)): Path<(Uuid, String)>,
) -> AppResult<Json<ReminderView>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    session.reminders_mut().toggle(&state.store, &member_id)?;
    Ok(Json(session.reminders().view(&state.store)))
}

/// POST /api/sessions/:id/reminders/toggle-all
pub async fn toggle_all(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReminderView>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    session.reminders_mut().toggle_all(&state.store)?;
    Ok(Json(session.reminders().view(&state.store)))
}

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    pub view: ReminderView,
}

/// POST /api/sessions/:id/reminders/dispatch
///
/// 立即返回; 发送在后台按顺序进行, 通过 GET 查看进度。
pub async fn dispatch(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DispatchResponse>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    let outcome = session
        .reminders_mut()
        .dispatch(&state.store, &state.dispatcher, today())?;
    Ok(Json(DispatchResponse {
        outcome,
        view: session.reminders().view(&state.store),
    }))
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
    pub view: ReminderView,
}

/// POST /api/sessions/:id/reminders/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CancelResponse>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    let cancelled = session.reminders_mut().cancel().await;
    Ok(Json(CancelResponse {
        cancelled,
        view: session.reminders().view(&state.store),
    }))
}

/// POST /api/sessions/:id/reminders/close - 离开发送页面
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<NavState>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    let nav = session.leave_reminders(&state.store)?;
    Ok(Json(nav))
}
