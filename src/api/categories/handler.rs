//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Category, CategoryCreate, CategoryPageQuery, CategoryUpdate, PageResult,
};
use crate::db::repository::category;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category_type: Option<i64>,
}

/// POST /api/categories - 新增分类 (默认停用)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    payload.validate()?;
    let created = category::create(&state.pool, payload, user.employee_id).await?;
    Ok(Json(created))
}

/// GET /api/categories/page - 分类分页查询
pub async fn page(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<CategoryPageQuery>,
) -> AppResult<Json<PageResult<Category>>> {
    let result = category::page(&state.pool, &query).await?;
    Ok(Json(result))
}

/// GET /api/categories/list - 根据类型查询分类
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = category::list_by_type(&state.pool, query.category_type).await?;
    Ok(Json(categories))
}

/// PUT /api/categories/:id - 修改分类
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let updated = category::update(&state.pool, id, payload, user.employee_id).await?;
    Ok(Json(updated))
}

/// POST /api/categories/:id/status/:enabled - 启用、禁用分类
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, enabled)): Path<(i64, bool)>,
) -> AppResult<Json<bool>> {
    category::set_enabled(&state.pool, id, enabled, user.employee_id).await?;
    Ok(Json(true))
}

/// DELETE /api/categories/:id - 删除分类 (被菜品或套餐引用时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    category::delete(&state.pool, id).await?;
    Ok(Json(true))
}
