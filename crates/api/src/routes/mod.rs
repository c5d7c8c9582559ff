//! Route handlers for the classroom API.

pub mod account;
pub mod health;
pub mod leaderboard;
pub mod scores;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Scores and leaderboards
        .route("/api/scores", post(scores::submit_score))
        .route("/api/leaderboard/games/:game_id", get(leaderboard::per_game))
        .route("/api/leaderboard/all", get(leaderboard::all_games))
        // Account lifecycle
        .route("/api/account/delete", post(account::delete_own_account))
        .route(
            "/api/schools/:school_id/accounts/delete",
            post(account::delete_managed_account),
        )
}

/// Router with request tracing, bound to `state`.
pub fn app(state: AppState) -> Router {
    router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
