//! Account lifecycle and leaderboard aggregation.
//!
//! This crate holds the service operations behind the classroom backend:
//!
//! - [`ScoreService`] appends score events for the authenticated caller.
//! - [`Leaderboard`] ranks those events per game (best play) or across all
//!   games (total), over all time, the current month or the current week.
//! - [`AccountDeletion`] deletes the caller's own account and its dependent
//!   records in one transaction, then removes the credential best-effort.
//! - [`ManagedAccountDeletion`] lets school and district admins delete
//!   student, teacher and staff accounts.
//!
//! Every service is an explicitly constructed value holding a
//! [`database::Database`] handle plus its collaborators; clone it freely.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use accounts::{
//!     AccountDeletion, Caller, Leaderboard, SqliteCredentialStore, SystemClock, TimeWindow,
//!     WindowConfig,
//! };
//! use database::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:classroom.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let leaderboard = Leaderboard::new(db.clone(), Arc::new(SystemClock), WindowConfig::default());
//!     for row in leaderboard.all_games(TimeWindow::CurrentWeek, 10).await? {
//!         println!("{} {} {}", row.rank, row.display_name, row.score);
//!     }
//!
//!     let deletion = AccountDeletion::new(db.clone(), Arc::new(SqliteCredentialStore::new(db)));
//!     deletion.delete_own_account(Some(&Caller::new("user-123"))).await?;
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod credentials;
pub mod deletion;
pub mod error;
pub mod identity;
pub mod leaderboard;
pub mod managed;
pub mod scores;
pub mod validation;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{CredentialCleanup, CredentialStore, SqliteCredentialStore};
pub use deletion::{AccountDeletion, DeletedAccount, DeletionPlan};
pub use error::{CredentialError, Result, ServiceError};
pub use identity::Caller;
pub use leaderboard::{Leaderboard, LeaderboardRank};
pub use managed::{
    AccountType, AdminScope, DeleteManagedAccount, DeletedManagedAccount, ManagedAccountDeletion,
};
pub use scores::{ScoreService, SubmitScore};
pub use validation::ValidationError;
pub use window::{CalendarZone, TimeWindow, WindowConfig};
