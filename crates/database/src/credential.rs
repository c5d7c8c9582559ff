//! Authentication credentials.
//!
//! Credentials are kept apart from account records: they are removed after an
//! account cascade commits, never inside it.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Credential;

/// Register a credential for a user.
pub async fn create_credential(pool: &SqlitePool, user_id: &str, provider: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO credentials (user_id, provider)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(provider)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "Credential", user_id))?;

    Ok(())
}

/// Get a user's credential.
pub async fn get_credential(pool: &SqlitePool, user_id: &str) -> Result<Option<Credential>> {
    let record = sqlx::query_as::<_, Credential>(
        r#"
        SELECT user_id, provider, created_at
        FROM credentials
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Delete a user's credential.
///
/// Returns an error if there was no credential to delete.
pub async fn delete_credential(pool: &SqlitePool, user_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM credentials
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Credential",
            id: user_id.to_string(),
        });
    }

    Ok(())
}
