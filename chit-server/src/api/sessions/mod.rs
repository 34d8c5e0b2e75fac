//! Admin Session API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/sessions | POST | 打开会话 |
//! | /api/sessions/{id} | GET / DELETE | 查看 / 关闭会话 (关闭时取消发送) |
//! | /api/sessions/{id}/navigation | GET / POST | 当前页面 / 切换页面 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route(
            "/{id}/navigation",
            get(handler::current_screen).post(handler::navigate),
        )
}
