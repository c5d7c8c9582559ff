//! Role-specific profile records.
//!
//! Every profile table has the same shape (`id`, `user_id`, `school_id`,
//! `display_name`), so one set of helpers serves all of them, keyed by
//! [`ProfileKind`].

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::Profile;

/// Profile collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Teacher,
    Sub,
    Parent,
    Student,
    Staff,
}

impl ProfileKind {
    /// Get the table that stores this kind of profile.
    pub fn table_name(&self) -> &'static str {
        match self {
            ProfileKind::Teacher => "teachers",
            ProfileKind::Sub => "subs",
            ProfileKind::Parent => "parents",
            ProfileKind::Student => "students",
            ProfileKind::Staff => "staff",
        }
    }

    /// Entity name used in errors.
    pub fn entity(&self) -> &'static str {
        match self {
            ProfileKind::Teacher => "Teacher",
            ProfileKind::Sub => "Sub",
            ProfileKind::Parent => "Parent",
            ProfileKind::Student => "Student",
            ProfileKind::Staff => "Staff",
        }
    }
}

/// Create a profile.
pub async fn create_profile(pool: &SqlitePool, kind: ProfileKind, profile: &Profile) -> Result<()> {
    // Table names cannot be bound; they come from the closed ProfileKind enum.
    let query = format!(
        r#"
        INSERT INTO {table} (id, user_id, school_id, display_name)
        VALUES (?, ?, ?, ?)
        "#,
        table = kind.table_name()
    );

    sqlx::query(&query)
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(&profile.school_id)
        .bind(&profile.display_name)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, kind.entity(), &profile.id))?;

    Ok(())
}

/// List every profile of `kind` owned by a user.
pub async fn list_profiles_for_user(
    pool: &SqlitePool,
    kind: ProfileKind,
    user_id: &str,
) -> Result<Vec<Profile>> {
    let query = format!(
        r#"
        SELECT id, user_id, school_id, display_name
        FROM {table}
        WHERE user_id = ?
        ORDER BY id
        "#,
        table = kind.table_name()
    );

    let profiles = sqlx::query_as::<_, Profile>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(profiles)
}

/// Delete one profile by its own ID.
pub async fn delete_profile(
    executor: impl SqliteExecutor<'_>,
    kind: ProfileKind,
    id: &str,
) -> Result<u64> {
    let query = format!(
        r#"
        DELETE FROM {table}
        WHERE id = ?
        "#,
        table = kind.table_name()
    );

    let result = sqlx::query(&query).bind(id).execute(executor).await?;
    Ok(result.rows_affected())
}

/// Delete every profile of `kind` owned by a user.
pub async fn delete_profiles_for_user(
    executor: impl SqliteExecutor<'_>,
    kind: ProfileKind,
    user_id: &str,
) -> Result<u64> {
    let query = format!(
        r#"
        DELETE FROM {table}
        WHERE user_id = ?
        "#,
        table = kind.table_name()
    );

    let result = sqlx::query(&query).bind(user_id).execute(executor).await?;
    Ok(result.rows_affected())
}

/// Delete every profile of `kind` owned by a user, returning the school of
/// each deleted row.
///
/// An empty result means nothing was deleted.
pub async fn delete_profiles_returning_schools(
    executor: impl SqliteExecutor<'_>,
    kind: ProfileKind,
    user_id: &str,
) -> Result<Vec<Option<String>>> {
    let query = format!(
        r#"
        DELETE FROM {table}
        WHERE user_id = ?
        RETURNING school_id
        "#,
        table = kind.table_name()
    );

    let schools = sqlx::query_scalar::<_, Option<String>>(&query)
        .bind(user_id)
        .fetch_all(executor)
        .await?;

    Ok(schools)
}
