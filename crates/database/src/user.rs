//! User records in the identity store.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{User, UserRow};

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, role, active_school_id, district_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(user.role.as_str())
    .bind(&user.active_school_id)
    .bind(&user.district_id)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "User", &user.id))?;

    Ok(())
}

/// Look up a user by ID, returning `None` if absent.
pub async fn find_user(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, role, active_school_id, district_id
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(User::try_from).transpose()
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    find_user(pool, id).await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Delete a user by ID.
///
/// Returns the number of rows removed (0 if the user was already gone).
pub async fn delete_user(executor: impl SqliteExecutor<'_>, id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
