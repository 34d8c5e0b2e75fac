//! Dashboard API 模块

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use shared::models::DashboardStats;
use shared::util::today;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/dashboard", get(stats))
}

/// GET /api/dashboard - 群组数、成员数、本月待提醒数
pub async fn stats(State(state): State<ServerState>) -> Json<DashboardStats> {
    Json(state.store.dashboard(today()))
}
