//! Dish and DishFlavor Models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dish entity (菜品)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    /// Price in cents
    pub price: i64,
    pub image: String,
    pub description: String,
    /// Off-sale is a precondition for batch deletion
    pub is_on_sale: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: i64,
    pub updated_by: i64,
}

/// Flavor row owned by one dish (e.g. spice level with its allowed values).
///
/// Never addressed individually by callers: the whole set is replaced
/// together with its owning dish.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DishFlavor {
    pub id: i64,
    pub dish_id: i64,
    pub name: String,
    /// Allowed values, stored as a JSON array
    #[sqlx(json)]
    pub value: Vec<String>,
}

/// Flavor payload inside dish create/update requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorInput {
    pub name: String,
    #[serde(default)]
    pub value: Vec<String>,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DishCreate {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    pub category_id: i64,
    #[validate(range(min = 0))]
    pub price: i64,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub flavors: Vec<FlavorInput>,
}

/// Update dish payload — overwrites the dish row and replaces its flavor set
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DishUpdate {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    pub category_id: i64,
    #[validate(range(min = 0))]
    pub price: i64,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub flavors: Vec<FlavorInput>,
}

/// Dish joined with its category name (paged listing projection)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DishView {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub price: i64,
    pub image: String,
    pub description: String,
    pub is_on_sale: bool,
    pub updated_at: i64,
}

/// Dish composite with its full flavor set
#[derive(Debug, Clone, Serialize)]
pub struct DishWithFlavors {
    #[serde(flatten)]
    pub dish: Dish,
    pub flavors: Vec<DishFlavor>,
}

/// Paged dish query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishPageQuery {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub is_on_sale: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}
