//! Leaderboard aggregation over the score event log.
//!
//! Rankings are derived on every read and never stored. Two modes exist:
//!
//! - **per game**: a player's score is their best single play of that game.
//! - **all games**: a player's score is the sum of every play in the window.
//!
//! Players keep the order in which their first event was seen, and the sort is
//! stable, so equal scores stay in that order. No secondary tie-break key is
//! applied.

use std::collections::HashMap;
use std::sync::Arc;

use database::{score, Database, ScoreEvent};
use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;
use crate::validation::{validate_id, ValidationError};
use crate::window::{TimeWindow, WindowConfig};

/// Name shown for players who never submitted a display name.
pub const PLACEHOLDER_NAME: &str = "Player";

/// Largest number of rows a single read may return.
pub const MAX_LIMIT: usize = 100;

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRank {
    /// 1-based dense rank; equal scores share a rank.
    pub rank: u32,
    pub user_id: String,
    pub display_name: String,
    pub score: i64,
}

/// How a player's events combine into one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMode {
    /// Highest single score.
    Best,
    /// Sum of all scores.
    Total,
}

struct Standing<'a> {
    user_id: &'a str,
    score: i64,
    display_name: Option<&'a str>,
}

/// Rank `events` (oldest first) and keep the top `limit` rows.
pub fn aggregate(events: &[ScoreEvent], mode: AggregateMode, limit: usize) -> Vec<LeaderboardRank> {
    let mut standings: Vec<Standing<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for event in events {
        let slot = *index.entry(event.user_id.as_str()).or_insert_with(|| {
            standings.push(Standing {
                user_id: &event.user_id,
                score: match mode {
                    AggregateMode::Best => i64::MIN,
                    AggregateMode::Total => 0,
                },
                display_name: None,
            });
            standings.len() - 1
        });

        let standing = &mut standings[slot];
        standing.score = match mode {
            AggregateMode::Best => standing.score.max(event.score),
            AggregateMode::Total => standing.score.saturating_add(event.score),
        };
        // Later events win: the log is read oldest first.
        if let Some(name) = event.display_name.as_deref() {
            standing.display_name = Some(name);
        }
    }

    // sort_by is stable; ties keep first-seen order.
    standings.sort_by(|a, b| b.score.cmp(&a.score));

    let mut ranks = Vec::with_capacity(standings.len().min(limit));
    let mut rank = 0u32;
    let mut previous: Option<i64> = None;

    for standing in standings.into_iter().take(limit) {
        if previous != Some(standing.score) {
            rank += 1;
            previous = Some(standing.score);
        }
        ranks.push(LeaderboardRank {
            rank,
            user_id: standing.user_id.to_string(),
            display_name: standing
                .display_name
                .unwrap_or(PLACEHOLDER_NAME)
                .to_string(),
            score: standing.score,
        });
    }

    ranks
}

/// Validate a requested row limit.
pub fn validate_limit(limit: usize) -> std::result::Result<usize, ValidationError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_LIMIT as i64,
            actual: i64::try_from(limit).unwrap_or(i64::MAX),
        });
    }
    Ok(limit)
}

/// Read-only leaderboard queries.
#[derive(Clone)]
pub struct Leaderboard {
    db: Database,
    clock: Arc<dyn Clock>,
    windows: WindowConfig,
}

impl Leaderboard {
    pub fn new(db: Database, clock: Arc<dyn Clock>, windows: WindowConfig) -> Self {
        Self { db, clock, windows }
    }

    /// Best single score per player for one game.
    pub async fn per_game(
        &self,
        game_id: &str,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<LeaderboardRank>> {
        let game_id = validate_id("gameId", game_id)?;
        let limit = validate_limit(limit)?;
        let events = self.events(Some(game_id), window).await?;

        debug!(
            game_id = %game_id,
            window = %window,
            events = events.len(),
            "Aggregating per-game leaderboard"
        );
        Ok(aggregate(&events, AggregateMode::Best, limit))
    }

    /// Total score per player across every game.
    pub async fn all_games(&self, window: TimeWindow, limit: usize) -> Result<Vec<LeaderboardRank>> {
        let limit = validate_limit(limit)?;
        let events = self.events(None, window).await?;

        debug!(
            window = %window,
            events = events.len(),
            "Aggregating all-games leaderboard"
        );
        Ok(aggregate(&events, AggregateMode::Total, limit))
    }

    async fn events(&self, game_id: Option<&str>, window: TimeWindow) -> Result<Vec<ScoreEvent>> {
        let since_ms = self
            .windows
            .start(window, self.clock.now())
            .map(|start| start.timestamp_millis());

        Ok(score::list_events(self.db.pool(), game_id, since_ms).await?)
    }
}
