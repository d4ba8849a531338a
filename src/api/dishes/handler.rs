//! Dish API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    DishCreate, DishPageQuery, DishUpdate, DishView, DishWithFlavors, PageResult,
};
use crate::db::repository::dish;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<i64>,
}

/// POST /api/dishes - 新增菜品 (连同口味，事务内)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<DishWithFlavors>> {
    payload.validate()?;
    let created = dish::create(&state.pool, payload, user.employee_id).await?;
    Ok(Json(created))
}

/// GET /api/dishes/page - 菜品分页查询 (含分类名称)
pub async fn page(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<DishPageQuery>,
) -> AppResult<Json<PageResult<DishView>>> {
    let result = dish::page(&state.pool, &query).await?;
    Ok(Json(result))
}

/// GET /api/dishes/:id - 根据 id 查询菜品和口味
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DishWithFlavors>> {
    let composite = dish::get_with_flavors(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Dish {id} not found")))?;
    Ok(Json(composite))
}

/// PUT /api/dishes/:id - 修改菜品并整体替换口味
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<DishWithFlavors>> {
    payload.validate()?;
    let updated = dish::update_with_flavors(&state.pool, id, payload, user.employee_id).await?;
    Ok(Json(updated))
}

/// POST /api/dishes/:id/status/:on_sale - 起售、停售菜品
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, on_sale)): Path<(i64, bool)>,
) -> AppResult<Json<bool>> {
    dish::set_on_sale(&state.pool, id, on_sale, user.employee_id).await?;
    Ok(Json(true))
}

/// DELETE /api/dishes - 批量删除菜品 (起售或关联套餐时整批拒绝)
pub async fn batch_delete(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<bool>> {
    dish::delete_batch(&state.pool, &payload.ids).await?;
    Ok(Json(true))
}
