//! Setmeal Repository
//!
//! Setmeals and their dish associations are read-only from the admin core's
//! perspective: only reference counts and lookups, used as deletion guards.

use super::{RepoResult, in_placeholders};
use sqlx::SqlitePool;

/// Count setmeals referencing a category
pub async fn count_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM setmeal WHERE category_id = ?")
        .bind(category_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Distinct setmeal ids linked to any of the given dishes
pub async fn ids_linked_to_dishes(pool: &SqlitePool, dish_ids: &[i64]) -> RepoResult<Vec<i64>> {
    if dish_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT DISTINCT setmeal_id FROM setmeal_dish WHERE dish_id IN ({})",
        in_placeholders(dish_ids.len())
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in dish_ids {
        query = query.bind(id);
    }
    let ids = query.fetch_all(pool).await?;
    Ok(ids)
}
