//! Schools, their student counters and district grants.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::School;

/// Create a new school.
pub async fn create_school(pool: &SqlitePool, school: &School) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO schools (id, name, student_count)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&school.id)
    .bind(&school.name)
    .bind(school.student_count)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "School", &school.id))?;

    Ok(())
}

/// Get a school by ID.
pub async fn get_school(pool: &SqlitePool, id: &str) -> Result<School> {
    sqlx::query_as::<_, School>(
        r#"
        SELECT id, name, student_count
        FROM schools
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "School",
        id: id.to_string(),
    })
}

/// Decrement a school's student count by one.
///
/// This is a relative update evaluated by SQLite, so concurrent callers never
/// overwrite each other's decrement. The count never drops below zero.
/// Returns the number of schools updated.
pub async fn decrement_student_count(
    executor: impl SqliteExecutor<'_>,
    school_id: &str,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE schools
        SET student_count = student_count - 1
        WHERE id = ? AND student_count > 0
        "#,
    )
    .bind(school_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Allow a district's admins to manage a school.
pub async fn grant_district_school(
    pool: &SqlitePool,
    district_id: &str,
    school_id: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO district_schools (district_id, school_id)
        VALUES (?, ?)
        "#,
    )
    .bind(district_id)
    .bind(school_id)
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::from_insert(e, "DistrictSchool", &format!("{}/{}", district_id, school_id))
    })?;

    Ok(())
}

/// Check whether a district's admins may manage a school.
pub async fn district_manages_school(
    pool: &SqlitePool,
    district_id: &str,
    school_id: &str,
) -> Result<bool> {
    let result = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT 1
        FROM district_schools
        WHERE district_id = ? AND school_id = ?
        "#,
    )
    .bind(district_id)
    .bind(school_id)
    .fetch_optional(pool)
    .await?;

    Ok(result.is_some())
}
