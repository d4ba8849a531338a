//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Category type: groups dishes
pub const CATEGORY_TYPE_DISH: i64 = 1;
/// Category type: groups setmeals (combo meals)
pub const CATEGORY_TYPE_SETMEAL: i64 = 2;

/// Category entity (菜品/套餐分类)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    /// 1 = dish category, 2 = setmeal category
    pub category_type: i64,
    pub name: String,
    pub sort_order: i32,
    /// Disabled on creation; toggled via the status endpoint
    pub is_enabled: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: i64,
    pub updated_by: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[validate(range(min = 1, max = 2))]
    pub category_type: i64,
    pub sort_order: Option<i32>,
}

/// Update category payload (provided fields overwrite, omitted fields keep)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub category_type: Option<i64>,
    pub sort_order: Option<i32>,
}

/// Paged category query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPageQuery {
    /// Substring match on name
    pub name: Option<String>,
    pub category_type: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}
