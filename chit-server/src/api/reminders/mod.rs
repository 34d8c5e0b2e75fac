//! Send Reminder API 模块
//!
//! 所有路由都挂在某个管理员会话下: `/api/sessions/{id}/reminders`
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | / | GET | 当前选择、成员列表、发送进度 |
//! | /group | PUT | 切换群组 (重置选择并取消发送) |
//! | /mode | PUT | 切换选择模式 all / single / multi |
//! | /search | PUT | 搜索姓名或电话 |
//! | /toggle/{member_id} | POST | 勾选 / 取消勾选成员 |
//! | /toggle-all | POST | 全选 / 全不选 (当前过滤结果) |
//! | /dispatch | POST | 开始发送 (或继续未完成的发送) |
//! | /cancel | POST | 取消正在进行的发送 |
//! | /close | POST | 离开页面, 返回群组成员列表 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions/{id}/reminders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view))
        .route("/group", put(handler::select_group))
        .route("/mode", put(handler::set_mode))
        .route("/search", put(handler::set_query))
        .route("/toggle/{member_id}", post(handler::toggle))
        .route("/toggle-all", post(handler::toggle_all))
        .route("/dispatch", post(handler::dispatch))
        .route("/cancel", post(handler::cancel))
        .route("/close", post(handler::close))
}
