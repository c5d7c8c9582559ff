//! Lesson plan records.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::LessonPlan;

/// Create a lesson plan.
pub async fn create_lesson_plan(pool: &SqlitePool, plan: &LessonPlan) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO lesson_plans (id, teacher_id, title)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&plan.id)
    .bind(&plan.teacher_id)
    .bind(&plan.title)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "LessonPlan", &plan.id))?;

    Ok(())
}

/// List the IDs of every lesson plan authored by a teacher.
pub async fn list_ids_for_teacher(pool: &SqlitePool, teacher_id: &str) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT id
        FROM lesson_plans
        WHERE teacher_id = ?
        ORDER BY id
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Delete a lesson plan by ID.
pub async fn delete_lesson_plan(executor: impl SqliteExecutor<'_>, id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM lesson_plans
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
