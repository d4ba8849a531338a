//! Data Models
//!
//! Row structs (`sqlx::FromRow`) plus create/update payloads per entity.
//! Audit stamps (`created_at`/`updated_at` in epoch millis, actor ids) are
//! always written by the repository layer, never taken from payloads.

pub mod category;
pub mod dish;
pub mod employee;

pub use category::{Category, CategoryCreate, CategoryPageQuery, CategoryUpdate};
pub use dish::{
    Dish, DishCreate, DishFlavor, DishPageQuery, DishUpdate, DishView, DishWithFlavors,
    FlavorInput,
};
pub use employee::{
    Employee, EmployeeCreate, EmployeePageQuery, EmployeeUpdate, LoginRequest, LoginResponse,
};

use serde::Serialize;

/// One page of query results: total row count plus the requested window
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    pub total: i64,
    pub records: Vec<T>,
}

/// Resolve a page request into a `(limit, offset)` window.
///
/// Page numbers are 1-based; page size is clamped to 100.
pub fn page_window(page: Option<u32>, page_size: Option<u32>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1) as i64;
    let size = page_size.unwrap_or(10).clamp(1, 100) as i64;
    (size, (page - 1) * size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(None, None), (10, 0));
    }

    #[test]
    fn test_page_window_offset() {
        assert_eq!(page_window(Some(3), Some(20)), (20, 40));
    }

    #[test]
    fn test_page_window_clamps() {
        assert_eq!(page_window(Some(0), Some(1000)), (100, 0));
    }
}
