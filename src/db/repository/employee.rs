//! Employee Repository

use super::{RepoError, RepoResult};
use crate::db::models::employee::DEFAULT_PASSWORD;
use crate::db::models::{
    Employee, EmployeeCreate, EmployeePageQuery, EmployeeUpdate, PageResult, page_window,
};
use crate::utils::time::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, username, name, password, phone, is_enabled, created_at, updated_at, created_by, updated_by";

/// Find employee by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let emp = sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employee WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(emp)
}

/// Find employee by username
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Employee>> {
    let emp = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE username = ? LIMIT 1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(emp)
}

/// Create a new employee account
pub async fn create(pool: &SqlitePool, data: EmployeeCreate, actor: i64) -> RepoResult<Employee> {
    // Check duplicate username
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username '{}' already exists",
            data.username
        )));
    }

    let password = data.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
    let hash = Employee::hash_password(password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO employee (username, name, password, phone, is_enabled, created_at, updated_at, created_by, updated_by) \
         VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5, ?6, ?6) RETURNING id",
    )
    .bind(&data.username)
    .bind(&data.name)
    .bind(hash)
    .bind(&data.phone)
    .bind(now)
    .bind(actor)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Paged employee listing with optional name filter
pub async fn page(pool: &SqlitePool, query: &EmployeePageQuery) -> RepoResult<PageResult<Employee>> {
    let (limit, offset) = page_window(query.page, query.page_size);

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM employee WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%')",
    )
    .bind(&query.name)
    .fetch_one(pool)
    .await?;

    let records = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee \
         WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%') \
         ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
    ))
    .bind(&query.name)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(PageResult { total, records })
}

/// Enable or disable an account (partial update: status + stamps only)
pub async fn set_enabled(pool: &SqlitePool, id: i64, enabled: bool, actor: i64) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE employee SET is_enabled = ?1, updated_at = ?2, updated_by = ?3 WHERE id = ?4",
    )
    .bind(enabled)
    .bind(now_millis())
    .bind(actor)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    Ok(())
}

/// Update an employee
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: EmployeeUpdate,
    actor: i64,
) -> RepoResult<Employee> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;

    // Check duplicate username if changing
    if let Some(ref new_username) = data.username
        && new_username != &existing.username
        && find_by_username(pool, new_username).await?.is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Username '{new_username}' already exists"
        )));
    }

    let hash = match data.password.as_deref() {
        Some(password) => Some(
            Employee::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
        ),
        None => None,
    };

    sqlx::query(
        "UPDATE employee SET \
            username = COALESCE(?1, username), \
            name = COALESCE(?2, name), \
            phone = COALESCE(?3, phone), \
            password = COALESCE(?4, password), \
            updated_at = ?5, updated_by = ?6 \
         WHERE id = ?7",
    )
    .bind(&data.username)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(hash)
    .bind(now_millis())
    .bind(actor)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Verify credentials for login; rejects unknown, wrong-password and
/// disabled accounts with the same error shape
pub async fn verify_login(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> RepoResult<Employee> {
    let emp = find_by_username(pool, username)
        .await?
        .ok_or_else(|| RepoError::Validation("Invalid username or password".into()))?;

    let ok = emp
        .verify_password(password)
        .map_err(|e| RepoError::Database(format!("Password verification failed: {e}")))?;
    if !ok {
        return Err(RepoError::Validation("Invalid username or password".into()));
    }
    if !emp.is_enabled {
        return Err(RepoError::Validation("Account is disabled".into()));
    }
    Ok(emp)
}

/// Seed the default admin account when the employee table is empty
pub async fn ensure_admin(pool: &SqlitePool) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }
    create(
        pool,
        EmployeeCreate {
            username: "admin".to_string(),
            name: "Administrator".to_string(),
            phone: None,
            password: None,
        },
        0,
    )
    .await?;
    tracing::info!("Seeded default admin account");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn emp(username: &str) -> EmployeeCreate {
        EmployeeCreate {
            username: username.to_string(),
            name: username.to_string(),
            phone: None,
            password: Some("s3cret".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_login() {
        let pool = test_pool().await;
        let created = create(&pool, emp("alice"), 1).await.unwrap();
        assert!(created.is_enabled);
        assert_ne!(created.password, "s3cret"); // stored hashed

        let logged_in = verify_login(&pool, "alice", "s3cret").await.unwrap();
        assert_eq!(logged_in.id, created.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let pool = test_pool().await;
        create(&pool, emp("alice"), 1).await.unwrap();
        assert!(verify_login(&pool, "alice", "nope").await.is_err());
        assert!(verify_login(&pool, "ghost", "s3cret").await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_account_cannot_login() {
        let pool = test_pool().await;
        let created = create(&pool, emp("alice"), 1).await.unwrap();
        set_enabled(&pool, created.id, false, 1).await.unwrap();
        assert!(verify_login(&pool, "alice", "s3cret").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let pool = test_pool().await;
        create(&pool, emp("alice"), 1).await.unwrap();
        let err = create(&pool, emp("alice"), 1).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_default_password_applies() {
        let pool = test_pool().await;
        create(
            &pool,
            EmployeeCreate {
                username: "bob".to_string(),
                name: "Bob".to_string(),
                phone: None,
                password: None,
            },
            1,
        )
        .await
        .unwrap();
        verify_login(&pool, "bob", DEFAULT_PASSWORD).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_changes_password() {
        let pool = test_pool().await;
        let created = create(&pool, emp("alice"), 1).await.unwrap();
        update(
            &pool,
            created.id,
            EmployeeUpdate {
                username: None,
                name: Some("Alice L".to_string()),
                phone: Some("600123456".to_string()),
                password: Some("newpass".to_string()),
            },
            2,
        )
        .await
        .unwrap();

        assert!(verify_login(&pool, "alice", "s3cret").await.is_err());
        let emp = verify_login(&pool, "alice", "newpass").await.unwrap();
        assert_eq!(emp.name, "Alice L");
        assert_eq!(emp.updated_by, 2);
    }

    #[tokio::test]
    async fn test_ensure_admin_idempotent() {
        let pool = test_pool().await;
        ensure_admin(&pool).await.unwrap();
        ensure_admin(&pool).await.unwrap();
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 1);
        verify_login(&pool, "admin", DEFAULT_PASSWORD).await.unwrap();
    }

    #[tokio::test]
    async fn test_page_filters_by_name() {
        let pool = test_pool().await;
        create(&pool, emp("alice"), 1).await.unwrap();
        create(&pool, emp("bob"), 1).await.unwrap();
        let result = page(
            &pool,
            &EmployeePageQuery {
                name: Some("ali".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0].username, "alice");
    }
}
