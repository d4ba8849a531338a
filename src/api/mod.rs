//! API 路由模块
//!
//! # 结构
//!
//! - [`auth`] - 登录接口
//! - [`categories`] - 分类管理接口
//! - [`dishes`] - 菜品管理接口
//! - [`employees`] - 员工管理接口

pub mod auth;
pub mod categories;
pub mod dishes;
pub mod employees;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
