//! Group API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/groups", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/members", get(handler::members))
        .route("/{id}/reminder-settings", put(handler::update_reminder_settings))
        .route("/{id}/reminder-preview", get(handler::reminder_preview))
}
