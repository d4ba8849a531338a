//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Employee, EmployeeCreate, EmployeePageQuery, EmployeeUpdate, PageResult,
};
use crate::db::repository::employee;
use crate::utils::{AppError, AppResult};

/// POST /api/employees - 新增员工
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    payload.validate()?;
    let created = employee::create(&state.pool, payload, user.employee_id).await?;
    Ok(Json(created))
}

/// GET /api/employees/page - 员工分页查询
pub async fn page(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<EmployeePageQuery>,
) -> AppResult<Json<PageResult<Employee>>> {
    let result = employee::page(&state.pool, &query).await?;
    Ok(Json(result))
}

/// GET /api/employees/:id - 根据 id 查询员工
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    let emp = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {id} not found")))?;
    Ok(Json(emp))
}

/// PUT /api/employees/:id - 修改员工
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let updated = employee::update(&state.pool, id, payload, user.employee_id).await?;
    Ok(Json(updated))
}

/// POST /api/employees/:id/status/:enabled - 启用、禁用员工账号
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, enabled)): Path<(i64, bool)>,
) -> AppResult<Json<bool>> {
    employee::set_enabled(&state.pool, id, enabled, user.employee_id).await?;
    Ok(Json(true))
}
