//! Category Repository

use super::{BlockedReason, RepoError, RepoResult, dish, setmeal};
use crate::db::models::{
    Category, CategoryCreate, CategoryPageQuery, CategoryUpdate, PageResult, page_window,
};
use crate::utils::time::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, category_type, name, sort_order, is_enabled, created_at, updated_at, created_by, updated_by";

/// Find category by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

/// Create a new category — always starts disabled, full audit stamps
pub async fn create(pool: &SqlitePool, data: CategoryCreate, actor: i64) -> RepoResult<Category> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO category (category_type, name, sort_order, is_enabled, created_at, updated_at, created_by, updated_by) \
         VALUES (?1, ?2, ?3, 0, ?4, ?4, ?5, ?5) RETURNING id",
    )
    .bind(data.category_type)
    .bind(&data.name)
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .bind(actor)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

/// Paged category listing with optional name / type filters
pub async fn page(pool: &SqlitePool, query: &CategoryPageQuery) -> RepoResult<PageResult<Category>> {
    let (limit, offset) = page_window(query.page, query.page_size);

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM category \
         WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%') AND (?2 IS NULL OR category_type = ?2)",
    )
    .bind(&query.name)
    .bind(query.category_type)
    .fetch_one(pool)
    .await?;

    let records = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category \
         WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%') AND (?2 IS NULL OR category_type = ?2) \
         ORDER BY sort_order ASC, created_at DESC LIMIT ?3 OFFSET ?4"
    ))
    .bind(&query.name)
    .bind(query.category_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(PageResult { total, records })
}

/// All categories of the given type (all categories when type is absent),
/// regardless of enabled status
pub async fn list_by_type(
    pool: &SqlitePool,
    category_type: Option<i64>,
) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category \
         WHERE (?1 IS NULL OR category_type = ?1) \
         ORDER BY sort_order ASC, created_at DESC"
    ))
    .bind(category_type)
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Enable or disable a category.
///
/// Partial update: only the status and the update stamps are written.
pub async fn set_enabled(
    pool: &SqlitePool,
    id: i64,
    enabled: bool,
    actor: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE category SET is_enabled = ?1, updated_at = ?2, updated_by = ?3 WHERE id = ?4",
    )
    .bind(enabled)
    .bind(now_millis())
    .bind(actor)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

/// Update a category — provided fields overwrite, plus update stamps
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: CategoryUpdate,
    actor: i64,
) -> RepoResult<Category> {
    let rows = sqlx::query(
        "UPDATE category SET \
            name = COALESCE(?1, name), \
            category_type = COALESCE(?2, category_type), \
            sort_order = COALESCE(?3, sort_order), \
            updated_at = ?4, updated_by = ?5 \
         WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.category_type)
    .bind(data.sort_order)
    .bind(now_millis())
    .bind(actor)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category.
///
/// Guards run in order (dishes first, then setmeals) and re-query the store
/// on every call; the first violated one is reported and nothing is mutated.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let dish_count = dish::count_by_category(pool, id).await?;
    if dish_count > 0 {
        return Err(RepoError::DeletionBlocked(BlockedReason::HasDishes));
    }

    let setmeal_count = setmeal::count_by_category(pool, id).await?;
    if setmeal_count > 0 {
        return Err(RepoError::DeletionBlocked(BlockedReason::HasSetmeals));
    }

    sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::category::{CATEGORY_TYPE_DISH, CATEGORY_TYPE_SETMEAL};
    use crate::db::repository::test_support::test_pool;

    fn cat(name: &str, category_type: i64) -> CategoryCreate {
        CategoryCreate {
            name: name.to_string(),
            category_type,
            sort_order: Some(1),
        }
    }

    async fn seed_dish(pool: &SqlitePool, category_id: i64, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO dish (name, category_id, price) VALUES (?, ?, 100) RETURNING id",
        )
        .bind(name)
        .bind(category_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_setmeal(pool: &SqlitePool, category_id: i64, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO setmeal (category_id, name, price) VALUES (?, ?, 500) RETURNING id",
        )
        .bind(category_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_starts_disabled_with_stamps() {
        let pool = test_pool().await;
        let c = create(&pool, cat("Noodles", CATEGORY_TYPE_DISH), 7).await.unwrap();
        assert!(!c.is_enabled);
        assert_eq!(c.created_by, 7);
        assert_eq!(c.updated_by, 7);
        assert!(c.created_at > 0);
        assert_eq!(c.created_at, c.updated_at);
    }

    #[tokio::test]
    async fn test_set_enabled_is_partial_update() {
        let pool = test_pool().await;
        let c = create(&pool, cat("Noodles", CATEGORY_TYPE_DISH), 1).await.unwrap();

        set_enabled(&pool, c.id, true, 2).await.unwrap();

        let after = find_by_id(&pool, c.id).await.unwrap().unwrap();
        assert!(after.is_enabled);
        assert_eq!(after.updated_by, 2);
        // Everything else untouched
        assert_eq!(after.name, "Noodles");
        assert_eq!(after.sort_order, 1);
        assert_eq!(after.created_by, 1);
    }

    #[tokio::test]
    async fn test_set_enabled_missing_id() {
        let pool = test_pool().await;
        let err = set_enabled(&pool, 999, true, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_provided_fields() {
        let pool = test_pool().await;
        let c = create(&pool, cat("Noodles", CATEGORY_TYPE_DISH), 1).await.unwrap();

        let updated = update(
            &pool,
            c.id,
            CategoryUpdate {
                name: Some("Rice".to_string()),
                category_type: None,
                sort_order: Some(9),
            },
            3,
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Rice");
        assert_eq!(updated.sort_order, 9);
        assert_eq!(updated.category_type, CATEGORY_TYPE_DISH);
        assert_eq!(updated.updated_by, 3);
        assert_eq!(updated.created_by, 1);
    }

    #[tokio::test]
    async fn test_list_by_type_filters_and_ignores_status() {
        let pool = test_pool().await;
        let a = create(&pool, cat("Dish cat", CATEGORY_TYPE_DISH), 1).await.unwrap();
        create(&pool, cat("Combo cat", CATEGORY_TYPE_SETMEAL), 1).await.unwrap();
        // Disabled categories still show up
        set_enabled(&pool, a.id, false, 1).await.unwrap();

        let dish_cats = list_by_type(&pool, Some(CATEGORY_TYPE_DISH)).await.unwrap();
        assert_eq!(dish_cats.len(), 1);
        assert_eq!(dish_cats[0].name, "Dish cat");

        let all = list_by_type(&pool, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_page_filters_by_name() {
        let pool = test_pool().await;
        create(&pool, cat("Hot dishes", CATEGORY_TYPE_DISH), 1).await.unwrap();
        create(&pool, cat("Cold dishes", CATEGORY_TYPE_DISH), 1).await.unwrap();
        create(&pool, cat("Combos", CATEGORY_TYPE_SETMEAL), 1).await.unwrap();

        let page1 = page(
            &pool,
            &CategoryPageQuery {
                name: Some("dishes".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page1.total, 2);
        assert_eq!(page1.records.len(), 2);

        let page2 = page(
            &pool,
            &CategoryPageQuery {
                category_type: Some(CATEGORY_TYPE_SETMEAL),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page2.total, 1);
    }

    #[tokio::test]
    async fn test_delete_blocked_by_dishes() {
        let pool = test_pool().await;
        let c = create(&pool, cat("Noodles", CATEGORY_TYPE_DISH), 1).await.unwrap();
        seed_dish(&pool, c.id, "Ramen").await;

        let err = delete(&pool, c.id).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::DeletionBlocked(BlockedReason::HasDishes)
        ));
        // Row still present
        assert!(find_by_id(&pool, c.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_blocked_by_setmeals() {
        let pool = test_pool().await;
        let c = create(&pool, cat("Combos", CATEGORY_TYPE_SETMEAL), 1).await.unwrap();
        seed_setmeal(&pool, c.id, "Family meal").await;

        let err = delete(&pool, c.id).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::DeletionBlocked(BlockedReason::HasSetmeals)
        ));
        assert!(find_by_id(&pool, c.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_dish_guard_reported_first() {
        // Both guards violated: the dish check runs first and wins
        let pool = test_pool().await;
        let c = create(&pool, cat("Mixed", CATEGORY_TYPE_DISH), 1).await.unwrap();
        seed_dish(&pool, c.id, "Ramen").await;
        seed_setmeal(&pool, c.id, "Family meal").await;

        let err = delete(&pool, c.id).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::DeletionBlocked(BlockedReason::HasDishes)
        ));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_succeeds() {
        let pool = test_pool().await;
        let c = create(&pool, cat("Empty", CATEGORY_TYPE_DISH), 1).await.unwrap();
        delete(&pool, c.id).await.unwrap();
        assert!(find_by_id(&pool, c.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unblocks_after_dish_removed() {
        // Category 1 has dish 10 → delete fails; remove the dish, then succeed
        let pool = test_pool().await;
        let c = create(&pool, cat("Noodles", CATEGORY_TYPE_DISH), 1).await.unwrap();
        let dish_id = seed_dish(&pool, c.id, "Ramen").await;

        let err = delete(&pool, c.id).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::DeletionBlocked(BlockedReason::HasDishes)
        ));

        dish::delete_batch(&pool, &[dish_id]).await.unwrap();
        delete(&pool, c.id).await.unwrap();
        assert!(find_by_id(&pool, c.id).await.unwrap().is_none());
    }
}
