//! Admin Session API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::ServerState;
use crate::navigation::{NavParams, NavState, Screen};
use crate::sessions::SessionInfo;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

/// POST /api/sessions - 打开管理员会话
pub async fn create(State(state): State<ServerState>) -> (StatusCode, Json<SessionInfo>) {
    let (_, handle) = state.sessions.create();
    let info = handle.lock().await.info();
    (StatusCode::CREATED, Json(info))
}

/// GET /api/sessions/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionInfo>> {
    let handle = state.sessions.require(&id)?;
    let info = handle.lock().await.info();
    Ok(Json(info))
}

/// DELETE /api/sessions/:id - 关闭会话, 取消正在进行的发送
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    if !state.sessions.remove(&id).await {
        return Err(AppError::with_message(
            ErrorCode::SessionNotFound,
            format!("Session {} not found", id),
        ));
    }
    Ok(ApiResponse::ok())
}

/// GET /api/sessions/:id/navigation - 当前页面
pub async fn current_screen(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<NavState>> {
    let handle = state.sessions.require(&id)?;
    let nav = handle.lock().await.navigation().clone();
    Ok(Json(nav))
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub screen: Screen,
    #[serde(flatten)]
    pub params: NavParams,
}

/// POST /api/sessions/:id/navigation - 切换页面
pub async fn navigate(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NavigateRequest>,
) -> AppResult<Json<NavState>> {
    let handle = state.sessions.require(&id)?;
    let mut session = handle.lock().await;
    let nav = session.navigate(&state.store, payload.screen, payload.params)?;
    Ok(Json(nav))
}
