//! Category API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/page", get(handler::page))
        .route("/list", get(handler::list))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/status/{enabled}", post(handler::set_status))
}
