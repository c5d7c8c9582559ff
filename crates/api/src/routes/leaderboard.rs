//! Leaderboard reads.

use accounts::{LeaderboardRank, TimeWindow, ValidationError};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Query string accepted by both leaderboard endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub window: Option<String>,
    pub limit: Option<String>,
}

impl LeaderboardQuery {
    fn window(&self) -> std::result::Result<TimeWindow, ValidationError> {
        match self.window.as_deref() {
            Some(raw) => raw.trim().parse(),
            None => Ok(TimeWindow::AllTime),
        }
    }

    fn limit(&self, default: usize) -> std::result::Result<usize, ValidationError> {
        match self.limit.as_deref() {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ValidationError::NotANumber {
                    field: "limit".to_string(),
                    value: raw.to_string(),
                }),
            None => Ok(default),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    pub window: TimeWindow,
    pub entries: Vec<LeaderboardRank>,
}

/// Best single play per player for one game.
pub async fn per_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let window = query.window()?;
    let limit = query.limit(state.default_limit)?;
    let entries = state.leaderboard.per_game(&game_id, window, limit).await?;

    Ok(Json(LeaderboardResponse {
        game_id: Some(game_id.trim().to_string()),
        window,
        entries,
    }))
}

/// Total score per player across all games.
pub async fn all_games(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let window = query.window()?;
    let limit = query.limit(state.default_limit)?;
    let entries = state.leaderboard.all_games(window, limit).await?;

    Ok(Json(LeaderboardResponse {
        game_id: None,
        window,
        entries,
    }))
}
