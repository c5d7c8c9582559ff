//! Conversations and their participants.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{Conversation, ConversationMembership};

/// Create a conversation with an ordered list of participants.
///
/// The conversation row and its participant rows are written in one transaction.
pub async fn create_conversation(pool: &SqlitePool, conversation: &Conversation) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO conversations (id)
        VALUES (?)
        "#,
    )
    .bind(&conversation.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "Conversation", &conversation.id))?;

    for (position, user_id) in conversation.participant_ids.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id, position)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&conversation.id)
        .bind(user_id)
        .bind(position as i64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Get a conversation with its participants in order.
pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Option<Conversation>> {
    let exists = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT 1
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if exists.is_none() {
        return Ok(None);
    }

    let participant_ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT user_id
        FROM conversation_participants
        WHERE conversation_id = ?
        ORDER BY position
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(Conversation {
        id: id.to_string(),
        participant_ids,
    }))
}

/// List the conversations a user takes part in, with each one's participant count.
pub async fn list_memberships_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ConversationMembership>> {
    let memberships = sqlx::query_as::<_, ConversationMembership>(
        r#"
        SELECT p.conversation_id AS conversation_id,
               (SELECT COUNT(*)
                FROM conversation_participants all_p
                WHERE all_p.conversation_id = p.conversation_id) AS participant_count
        FROM conversation_participants p
        WHERE p.user_id = ?
        ORDER BY p.conversation_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(memberships)
}

/// Delete a conversation. Participant rows go with it.
pub async fn delete_conversation(executor: impl SqliteExecutor<'_>, id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
