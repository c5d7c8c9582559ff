//! Authentication credential store and best-effort cleanup.

use async_trait::async_trait;
use database::{credential, Database, DatabaseError};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CredentialError;

/// Backend holding users' sign-in credentials.
///
/// This is separate from the account records: the data store is authoritative,
/// so an orphaned credential is tolerated.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Delete the credential for `user_id`.
    async fn delete_credential(&self, user_id: &str) -> Result<(), CredentialError>;
}

/// Credential store backed by the `credentials` table.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    db: Database,
}

impl SqliteCredentialStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn delete_credential(&self, user_id: &str) -> Result<(), CredentialError> {
        credential::delete_credential(self.db.pool(), user_id)
            .await
            .map_err(|err| match err {
                DatabaseError::NotFound { id, .. } => CredentialError::NotFound(id),
                other => CredentialError::Store(other.to_string()),
            })
    }
}

/// Outcome of the trailing credential cleanup after a committed deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialCleanup {
    /// The credential was deleted.
    Removed,
    /// Deletion failed; the failure was logged and discarded.
    Failed,
    /// This path does not touch credentials.
    Skipped,
}

/// Delete a credential without letting a failure reach the caller.
///
/// Runs only after the account batch has committed, so there is nothing to
/// roll back: an error is logged and reported as [`CredentialCleanup::Failed`].
pub async fn remove_credential(store: &dyn CredentialStore, user_id: &str) -> CredentialCleanup {
    match store.delete_credential(user_id).await {
        Ok(()) => {
            info!(user_id = %user_id, "Deleted credential");
            CredentialCleanup::Removed
        }
        Err(err) => {
            warn!(
                user_id = %user_id,
                error = %err,
                "Credential cleanup failed after account deletion; leaving it to the client"
            );
            CredentialCleanup::Failed
        }
    }
}
