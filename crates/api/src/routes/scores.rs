//! Score submission.

use accounts::SubmitScore;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::MaybeCaller;
use crate::error::Result;
use crate::state::AppState;

/// Record a finished play for the caller.
///
/// Always answers 202 once the body parses; unauthenticated submissions are
/// dropped without a write.
pub async fn submit_score(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
    payload: std::result::Result<Json<SubmitScore>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(request) = payload?;
    state.scores.submit(caller.as_ref(), request).await?;
    Ok(StatusCode::ACCEPTED)
}
