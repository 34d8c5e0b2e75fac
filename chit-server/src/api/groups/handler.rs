//! Group API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::reminders::template_vars;
use shared::models::{Group, GroupSummary, MemberRow, ReminderSettingsUpdate};
use shared::template::{self, TemplateVars};
use shared::util::{format_date, format_inr, next_due_date, today};
use shared::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/groups?q=xxx - 群组列表 (按名称搜索)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<GroupSummary>> {
    let groups = state.store.search_groups(&query.q);
    Json(groups.iter().map(GroupSummary::from).collect())
}

/// Group detail response
#[derive(Debug, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    pub amount_display: String,
    /// 实际登记的成员数
    pub enrolled_members: usize,
}

/// GET /api/groups/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<GroupDetail>> {
    let group = state
        .store
        .find_group(&id)
        .ok_or_else(|| AppError::group_not_found(&id))?;
    let enrolled_members = state.store.members_of(&id).len();
    Ok(Json(GroupDetail {
        amount_display: format_inr(group.amount),
        group,
        enrolled_members,
    }))
}

/// GET /api/groups/:id/members - 群组成员列表
pub async fn members(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MemberRow>>> {
    if state.store.find_group(&id).is_none() {
        return Err(AppError::group_not_found(&id));
    }
    let members = state.store.members_of(&id);
    Ok(Json(members.iter().map(MemberRow::from).collect()))
}

/// PUT /api/groups/:id/reminder-settings - 修改缴费日、地点、短信模板
pub async fn update_reminder_settings(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReminderSettingsUpdate>,
) -> AppResult<Json<Group>> {
    payload.check()?;
    let group = state.store.update_group_settings(&id, &payload)?;
    Ok(Json(group))
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub member_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReminderPreview {
    pub group_id: String,
    pub member_id: Option<String>,
    pub due_date: String,
    pub message: String,
    pub segments: u16,
}

/// GET /api/groups/:id/reminder-preview?member_id=xxx - 渲染后的提醒短信
///
/// 未指定成员时使用群组第一位成员; 群组为空时用示例姓名。
pub async fn reminder_preview(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<ReminderPreview>> {
    let group = state
        .store
        .find_group(&id)
        .ok_or_else(|| AppError::group_not_found(&id))?;

    let member = match query.member_id.as_deref() {
        Some(member_id) => {
            let member = state
                .store
                .find_member(member_id)
                .ok_or_else(|| AppError::member_not_found(member_id))?;
            if member.group_id != group.id {
                return Err(AppError::with_message(
                    ErrorCode::MemberGroupMismatch,
                    format!("Member {} is not in group {}", member_id, group.id),
                ));
            }
            Some(member)
        }
        None => state.store.members_of(&id).into_iter().next(),
    };

    let today = today();
    let vars = match &member {
        Some(member) => template_vars(&group, member, today),
        None => TemplateVars {
            name: "Member".into(),
            group: group.name.clone(),
            date: format_date(next_due_date(today, group.due_day)),
            place: group.place.clone(),
        },
    };
    let message = template::render(&group.message_template, &vars);

    Ok(Json(ReminderPreview {
        group_id: group.id,
        member_id: member.map(|m| m.id),
        due_date: vars.date,
        segments: chit_sms::segment_count(&message),
        message,
    }))
}
