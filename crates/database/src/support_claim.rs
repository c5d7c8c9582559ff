//! Support claim records.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::SupportClaim;

/// Create a support claim.
pub async fn create_support_claim(pool: &SqlitePool, claim: &SupportClaim) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO support_claims (id, user_id, subject)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&claim.id)
    .bind(&claim.user_id)
    .bind(&claim.subject)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "SupportClaim", &claim.id))?;

    Ok(())
}

/// List the IDs of every support claim filed by a user.
pub async fn list_ids_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT id
        FROM support_claims
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Delete a support claim by ID.
pub async fn delete_support_claim(executor: impl SqliteExecutor<'_>, id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM support_claims
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
