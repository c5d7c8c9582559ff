//! Score ingestion.

use std::sync::Arc;

use database::{score, Database, NewScoreEvent};
use serde::Deserialize;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::Result;
use crate::identity::Caller;
use crate::validation::{validate_display_name, validate_id, validate_non_negative};

/// A finished play to record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScore {
    pub game_id: String,
    pub score: i64,
    #[serde(default)]
    pub elapsed_seconds: Option<i64>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Appends score events for the calling user.
#[derive(Clone)]
pub struct ScoreService {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl ScoreService {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Record a score under the caller's identity.
    ///
    /// Fire and forget: without a caller nothing is written and `Ok(None)` is
    /// returned. The stored user id always comes from `caller`. Returns the new
    /// event id otherwise.
    pub async fn submit(&self, caller: Option<&Caller>, request: SubmitScore) -> Result<Option<i64>> {
        let Some(caller) = caller else {
            debug!(game_id = %request.game_id, "Ignoring score from unauthenticated caller");
            return Ok(None);
        };

        let game_id = validate_id("gameId", &request.game_id)?;
        let score = validate_non_negative("score", request.score)?;
        let elapsed_seconds = request
            .elapsed_seconds
            .map(|secs| validate_non_negative("elapsedSeconds", secs))
            .transpose()?;
        let display_name = validate_display_name(request.display_name.as_deref())?;

        let event = NewScoreEvent {
            game_id: game_id.to_string(),
            user_id: caller.user_id.clone(),
            score,
            display_name,
            elapsed_seconds,
            created_at_ms: self.clock.now().timestamp_millis(),
        };

        let id = score::insert_score_event(self.db.pool(), &event).await?;
        info!(
            event_id = id,
            user_id = %event.user_id,
            game_id = %event.game_id,
            score = event.score,
            "Recorded score"
        );

        Ok(Some(id))
    }
}
