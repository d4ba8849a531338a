//! Dish Repository
//!
//! Dishes own their flavor rows exclusively. Create, update and batch delete
//! are each one transaction: the dish row and its flavor set never diverge.

use super::{BlockedReason, RepoError, RepoResult, in_placeholders, setmeal};
use crate::db::models::{
    Dish, DishCreate, DishFlavor, DishPageQuery, DishUpdate, DishView, DishWithFlavors,
    FlavorInput, PageResult, page_window,
};
use crate::utils::time::now_millis;
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "id, name, category_id, price, image, description, is_on_sale, created_at, updated_at, created_by, updated_by";

/// Find dish by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Dish>> {
    let dish = sqlx::query_as::<_, Dish>(&format!("SELECT {COLUMNS} FROM dish WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(dish)
}

/// Count dishes referencing a category (category deletion guard)
pub async fn count_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dish WHERE category_id = ?")
        .bind(category_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Flavor rows owned by a dish
pub async fn flavors_of(pool: &SqlitePool, dish_id: i64) -> RepoResult<Vec<DishFlavor>> {
    let flavors = sqlx::query_as::<_, DishFlavor>(
        "SELECT id, dish_id, name, value FROM dish_flavor WHERE dish_id = ? ORDER BY id",
    )
    .bind(dish_id)
    .fetch_all(pool)
    .await?;
    Ok(flavors)
}

async fn insert_flavors(
    tx: &mut Transaction<'_, Sqlite>,
    dish_id: i64,
    flavors: &[FlavorInput],
) -> RepoResult<()> {
    for flavor in flavors {
        let value = serde_json::to_string(&flavor.value)
            .map_err(|e| RepoError::Validation(format!("Invalid flavor values: {e}")))?;
        sqlx::query("INSERT INTO dish_flavor (dish_id, name, value) VALUES (?1, ?2, ?3)")
            .bind(dish_id)
            .bind(&flavor.name)
            .bind(value)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Create a dish together with its flavor rows, atomically.
///
/// Each flavor is stamped with the freshly generated dish id; if any flavor
/// insert fails the dish row is rolled back with it.
pub async fn create(pool: &SqlitePool, data: DishCreate, actor: i64) -> RepoResult<DishWithFlavors> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dish (name, category_id, price, image, description, is_on_sale, created_at, updated_at, created_by, updated_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6, ?7, ?7) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.category_id)
    .bind(data.price)
    .bind(data.image.as_deref().unwrap_or(""))
    .bind(data.description.as_deref().unwrap_or(""))
    .bind(now)
    .bind(actor)
    .fetch_one(&mut *tx)
    .await?;

    insert_flavors(&mut tx, id, &data.flavors).await?;

    tx.commit().await?;

    get_with_flavors(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dish".into()))
}

/// Paged dish listing joined with the category name
pub async fn page(pool: &SqlitePool, query: &DishPageQuery) -> RepoResult<PageResult<DishView>> {
    let (limit, offset) = page_window(query.page, query.page_size);

    const FILTER: &str = "(?1 IS NULL OR d.name LIKE '%' || ?1 || '%') \
         AND (?2 IS NULL OR d.category_id = ?2) \
         AND (?3 IS NULL OR d.is_on_sale = ?3)";

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM dish d WHERE {FILTER}"))
        .bind(&query.name)
        .bind(query.category_id)
        .bind(query.is_on_sale)
        .fetch_one(pool)
        .await?;

    let records = sqlx::query_as::<_, DishView>(&format!(
        "SELECT d.id, d.name, d.category_id, c.name AS category_name, d.price, d.image, \
                d.description, d.is_on_sale, d.updated_at \
         FROM dish d LEFT JOIN category c ON c.id = d.category_id \
         WHERE {FILTER} \
         ORDER BY d.updated_at DESC LIMIT ?4 OFFSET ?5"
    ))
    .bind(&query.name)
    .bind(query.category_id)
    .bind(query.is_on_sale)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(PageResult { total, records })
}

/// Dish composite with its full flavor set; absent when the id is unknown
pub async fn get_with_flavors(pool: &SqlitePool, id: i64) -> RepoResult<Option<DishWithFlavors>> {
    let Some(dish) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let flavors = flavors_of(pool, id).await?;
    Ok(Some(DishWithFlavors { dish, flavors }))
}

/// Overwrite a dish and replace its flavor set, atomically.
///
/// Destructive replace, not a merge: the old flavor rows are deleted and the
/// request's set inserted. An empty list leaves the dish with zero flavors.
pub async fn update_with_flavors(
    pool: &SqlitePool,
    id: i64,
    data: DishUpdate,
    actor: i64,
) -> RepoResult<DishWithFlavors> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE dish SET name = ?1, category_id = ?2, price = ?3, image = ?4, description = ?5, \
                updated_at = ?6, updated_by = ?7 \
         WHERE id = ?8",
    )
    .bind(&data.name)
    .bind(data.category_id)
    .bind(data.price)
    .bind(data.image.as_deref().unwrap_or(""))
    .bind(data.description.as_deref().unwrap_or(""))
    .bind(now_millis())
    .bind(actor)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dish {id} not found")));
    }

    sqlx::query("DELETE FROM dish_flavor WHERE dish_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_flavors(&mut tx, id, &data.flavors).await?;

    tx.commit().await?;

    get_with_flavors(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))
}

/// Delete a batch of dishes and the flavor rows they own.
///
/// Guards run before any write and one violating dish fails the whole batch:
/// every dish must exist and be off-sale, and none may be linked to a
/// setmeal. The two deletions run in one transaction.
pub async fn delete_batch(pool: &SqlitePool, ids: &[i64]) -> RepoResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    for &id in ids {
        let dish = find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))?;
        if dish.is_on_sale {
            return Err(RepoError::DeletionBlocked(BlockedReason::OnSale));
        }
    }

    let linked = setmeal::ids_linked_to_dishes(pool, ids).await?;
    if !linked.is_empty() {
        return Err(RepoError::DeletionBlocked(BlockedReason::LinkedToSetmeal));
    }

    let mut tx = pool.begin().await?;

    let sql = format!("DELETE FROM dish WHERE id IN ({})", in_placeholders(ids.len()));
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }
    query.execute(&mut *tx).await?;

    let sql = format!(
        "DELETE FROM dish_flavor WHERE dish_id IN ({})",
        in_placeholders(ids.len())
    );
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }
    query.execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(())
}

/// Put a dish on sale or take it off sale
pub async fn set_on_sale(pool: &SqlitePool, id: i64, on_sale: bool, actor: i64) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE dish SET is_on_sale = ?1, updated_at = ?2, updated_by = ?3 WHERE id = ?4",
    )
    .bind(on_sale)
    .bind(now_millis())
    .bind(actor)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dish {id} not found")));
    }
    Ok(())
}
