//! Parent-student link records.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::ParentStudentLink;

/// Link a parent user to a student. Returns the new link ID.
pub async fn create_link(pool: &SqlitePool, parent_user_id: &str, student_id: &str) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO parent_student_links (parent_user_id, student_id)
        VALUES (?, ?)
        "#,
    )
    .bind(parent_user_id)
    .bind(student_id)
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::from_insert(
            e,
            "ParentStudentLink",
            &format!("{}/{}", parent_user_id, student_id),
        )
    })?;

    Ok(result.last_insert_rowid())
}

/// List all links held by a parent user.
pub async fn list_links_for_parent(
    pool: &SqlitePool,
    parent_user_id: &str,
) -> Result<Vec<ParentStudentLink>> {
    let links = sqlx::query_as::<_, ParentStudentLink>(
        r#"
        SELECT id, parent_user_id, student_id
        FROM parent_student_links
        WHERE parent_user_id = ?
        ORDER BY id
        "#,
    )
    .bind(parent_user_id)
    .fetch_all(pool)
    .await?;

    Ok(links)
}

/// Delete a link by ID.
pub async fn delete_link(executor: impl SqliteExecutor<'_>, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM parent_student_links
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
