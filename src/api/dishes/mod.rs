//! Dish API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dishes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).delete(handler::batch_delete))
        .route("/page", get(handler::page))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/status/{on_sale}", post(handler::set_status))
}
