//! Application state shared across handlers.

use std::sync::Arc;

use accounts::{
    AccountDeletion, Clock, CredentialStore, Leaderboard, ManagedAccountDeletion, ScoreService,
    SqliteCredentialStore, WindowConfig,
};
use database::Database;

use crate::auth::TokenVerifier;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    pub scores: ScoreService,
    pub leaderboard: Leaderboard,
    pub deletion: AccountDeletion,
    pub managed: ManagedAccountDeletion,
    /// Bearer token verification.
    pub tokens: TokenVerifier,
    /// Rows returned when a leaderboard request names no limit.
    pub default_limit: usize,
}

impl AppState {
    /// Wire the services over one database.
    pub fn new(
        db: Database,
        clock: Arc<dyn Clock>,
        windows: WindowConfig,
        tokens: TokenVerifier,
        default_limit: usize,
    ) -> Self {
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(SqliteCredentialStore::new(db.clone()));

        Self {
            scores: ScoreService::new(db.clone(), clock.clone()),
            leaderboard: Leaderboard::new(db.clone(), clock, windows),
            deletion: AccountDeletion::new(db.clone(), credentials.clone()),
            managed: ManagedAccountDeletion::new(db.clone(), credentials),
            db,
            tokens,
            default_limit,
        }
    }
}
