//! Employee API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/page", get(handler::page))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/status/{enabled}", post(handler::set_status))
}
