//! Member API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use shared::models::{Member, MemberForm, PaymentHistoryView};
use shared::util::today;
use shared::{AppError, AppResult};

/// Member detail response (member + group name)
#[derive(Debug, Serialize)]
pub struct MemberDetail {
    #[serde(flatten)]
    pub member: Member,
    pub group_name: String,
    pub paid_this_month: bool,
}

fn detail(state: &ServerState, member: Member) -> MemberDetail {
    let group_name = state
        .store
        .find_group(&member.group_id)
        .map(|g| g.name)
        .unwrap_or_default();
    MemberDetail {
        paid_this_month: member.paid_in_month_of(today()),
        group_name,
        member,
    }
}

/// GET /api/members/:id - 获取单个成员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MemberDetail>> {
    let member = state
        .store
        .find_member(&id)
        .ok_or_else(|| AppError::member_not_found(&id))?;
    Ok(Json(detail(&state, member)))
}

/// GET /api/members/:id/payments - 缴费记录 (最近的在前)
pub async fn payments(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentHistoryView>> {
    let member = state
        .store
        .find_member(&id)
        .ok_or_else(|| AppError::member_not_found(&id))?;
    Ok(Json(PaymentHistoryView::from(&member)))
}

/// POST /api/members - 新增成员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MemberForm>,
) -> AppResult<(StatusCode, Json<MemberDetail>)> {
    let form = payload.normalized();
    form.check()?;
    let member = state.store.create_member(&form, today())?;
    Ok((StatusCode::CREATED, Json(detail(&state, member))))
}

/// PUT /api/members/:id - 编辑成员 (缴费数据不变)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MemberForm>,
) -> AppResult<Json<MemberDetail>> {
    let form = payload.normalized();
    form.check()?;
    let member = state.store.update_member(&id, &form, today())?;
    Ok(Json(detail(&state, member)))
}
