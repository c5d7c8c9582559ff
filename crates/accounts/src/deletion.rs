//! Self-service account deletion.
//!
//! The cascade is built in two phases. Reads first collect every record that
//! belongs to the account into a [`DeletionPlan`]; the plan is then applied in
//! one transaction. Records created after the reads are not part of the plan.
//! Once the transaction commits, the credential is removed best-effort.

use std::sync::Arc;

use database::{
    conversation, lesson_plan, parent_link, profile, support_claim, user, Database,
    DatabaseError, ProfileKind, Role,
};
use tracing::info;

use crate::credentials::{remove_credential, CredentialCleanup, CredentialStore};
use crate::error::{Result, ServiceError};
use crate::identity::Caller;

/// Conversations with at most this many participants are removed with a departing member.
const DIRECT_CONVERSATION_SIZE: i64 = 2;

/// Every record a self-service deletion will remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    pub user_id: String,
    /// Role of the stored user, if the user record still exists.
    pub role: Option<Role>,
    /// Role profiles by collection and profile id.
    pub profiles: Vec<(ProfileKind, String)>,
    pub parent_links: Vec<i64>,
    pub conversations: Vec<String>,
    pub lesson_plans: Vec<String>,
    pub support_claims: Vec<String>,
}

impl DeletionPlan {
    /// Number of dependent records (the user record itself excluded).
    pub fn dependent_count(&self) -> usize {
        self.profiles.len()
            + self.parent_links.len()
            + self.conversations.len()
            + self.lesson_plans.len()
            + self.support_claims.len()
    }
}

/// Result of a self-service deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedAccount {
    pub deleted_user_id: String,
    /// Not reported to the caller; kept for logging and tests.
    pub credential_cleanup: CredentialCleanup,
}

/// Deletes the caller's own account and everything hanging off it.
#[derive(Clone)]
pub struct AccountDeletion {
    db: Database,
    credentials: Arc<dyn CredentialStore>,
}

impl AccountDeletion {
    pub fn new(db: Database, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { db, credentials }
    }

    /// Delete the caller's account.
    ///
    /// There is no target parameter: only the caller's own account can be
    /// removed. Deleting an account that is already gone succeeds.
    pub async fn delete_own_account(&self, caller: Option<&Caller>) -> Result<DeletedAccount> {
        let caller = caller.ok_or(ServiceError::Unauthenticated)?;
        let user_id = caller.user_id.as_str();

        let plan = self.plan(user_id).await?;
        info!(
            user_id = %user_id,
            role = ?plan.role,
            dependents = plan.dependent_count(),
            "Deleting account"
        );

        self.apply(&plan).await?;
        info!(user_id = %user_id, "Account records deleted");

        let credential_cleanup = remove_credential(self.credentials.as_ref(), user_id).await;

        Ok(DeletedAccount {
            deleted_user_id: user_id.to_string(),
            credential_cleanup,
        })
    }

    /// Collect the records that deleting `user_id` would remove.
    pub async fn plan(&self, user_id: &str) -> std::result::Result<DeletionPlan, DatabaseError> {
        let pool = self.db.pool();
        let role = user::find_user(pool, user_id).await?.map(|u| u.role);

        let mut plan = DeletionPlan {
            user_id: user_id.to_string(),
            role,
            ..DeletionPlan::default()
        };

        let owned_profiles = match role {
            Some(Role::Teacher) => Some(ProfileKind::Teacher),
            Some(Role::Sub) => Some(ProfileKind::Sub),
            Some(Role::Parent) => Some(ProfileKind::Parent),
            Some(Role::Student) | Some(Role::School) | Some(Role::District) | None => None,
        };
        if let Some(kind) = owned_profiles {
            for found in profile::list_profiles_for_user(pool, kind, user_id).await? {
                plan.profiles.push((kind, found.id));
            }
        }

        if role == Some(Role::Parent) {
            plan.parent_links = parent_link::list_links_for_parent(pool, user_id)
                .await?
                .into_iter()
                .map(|link| link.id)
                .collect();
        }

        // Group conversations survive and keep this user's id as a stale participant.
        plan.conversations = conversation::list_memberships_for_user(pool, user_id)
            .await?
            .into_iter()
            .filter(|m| m.participant_count <= DIRECT_CONVERSATION_SIZE)
            .map(|m| m.conversation_id)
            .collect();

        plan.lesson_plans = lesson_plan::list_ids_for_teacher(pool, user_id).await?;
        plan.support_claims = support_claim::list_ids_for_user(pool, user_id).await?;

        Ok(plan)
    }

    /// Apply a plan atomically. On error nothing is persisted.
    async fn apply(&self, plan: &DeletionPlan) -> std::result::Result<(), DatabaseError> {
        let mut tx = self.db.begin().await?;

        for (kind, id) in &plan.profiles {
            profile::delete_profile(&mut *tx, *kind, id).await?;
        }
        for id in &plan.parent_links {
            parent_link::delete_link(&mut *tx, *id).await?;
        }
        user::delete_user(&mut *tx, &plan.user_id).await?;
        for id in &plan.conversations {
            conversation::delete_conversation(&mut *tx, id).await?;
        }
        for id in &plan.lesson_plans {
            lesson_plan::delete_lesson_plan(&mut *tx, id).await?;
        }
        for id in &plan.support_claims {
            support_claim::delete_support_claim(&mut *tx, id).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
