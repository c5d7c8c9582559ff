//! Append-only score event log.
//!
//! Events are inserted once and never updated or deleted through this crate.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{NewScoreEvent, ScoreEvent};

/// Append a score event. Returns the new event ID.
pub async fn insert_score_event(pool: &SqlitePool, event: &NewScoreEvent) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO score_events
            (game_id, user_id, score, display_name, elapsed_seconds, created_at_ms)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.game_id)
    .bind(&event.user_id)
    .bind(event.score)
    .bind(&event.display_name)
    .bind(event.elapsed_seconds)
    .bind(event.created_at_ms)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List score events, oldest first.
///
/// `game_id` restricts to one game; `since_ms` keeps events created at or after
/// that instant. `None` disables the corresponding filter.
pub async fn list_events(
    pool: &SqlitePool,
    game_id: Option<&str>,
    since_ms: Option<i64>,
) -> Result<Vec<ScoreEvent>> {
    let events = sqlx::query_as::<_, ScoreEvent>(
        r#"
        SELECT id, game_id, user_id, score, display_name, elapsed_seconds, created_at_ms
        FROM score_events
        WHERE (?1 IS NULL OR game_id = ?1)
          AND (?2 IS NULL OR created_at_ms >= ?2)
        ORDER BY created_at_ms ASC, id ASC
        "#,
    )
    .bind(game_id)
    .bind(since_ms)
    .fetch_all(pool)
    .await?;

    Ok(events)
}
