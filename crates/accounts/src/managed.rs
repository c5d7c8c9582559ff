//! Deletion of school-managed accounts by school or district admins.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use database::{profile, school, user, Database, DatabaseError, ProfileKind, Role};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::credentials::{remove_credential, CredentialCleanup, CredentialStore};
use crate::error::{Result, ServiceError};
use crate::identity::Caller;
use crate::validation::{validate_id, ValidationError};

/// Kind of managed account to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Student,
    Teacher,
    Staff,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Student => "student",
            AccountType::Teacher => "teacher",
            AccountType::Staff => "staff",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "student" => Ok(AccountType::Student),
            "teacher" => Ok(AccountType::Teacher),
            "staff" => Ok(AccountType::Staff),
            other => Err(ValidationError::Unrecognized {
                field: "accountType".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Request to delete a managed account, as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManagedAccount {
    pub target_account_id: String,
    pub account_type: String,
    pub school_id: String,
}

/// Which rule let the caller act on the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminScope {
    /// School admin acting on their active school.
    School,
    /// District admin acting on a school their district manages.
    District,
}

/// Result of a managed account deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedManagedAccount {
    pub deleted_id: String,
    pub account_type: AccountType,
    pub scope: AdminScope,
    /// Whether the school's student count went down. Only a student profile
    /// removed from the request's school counts.
    pub student_count_decremented: bool,
    /// Not reported to the caller; kept for logging and tests.
    pub credential_cleanup: CredentialCleanup,
}

/// Deletes student, teacher and staff accounts on behalf of admins.
#[derive(Clone)]
pub struct ManagedAccountDeletion {
    db: Database,
    credentials: Arc<dyn CredentialStore>,
}

impl ManagedAccountDeletion {
    pub fn new(db: Database, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { db, credentials }
    }

    /// Delete a managed account.
    ///
    /// Checks run in order: authentication, arguments, authorization. Nothing
    /// is written unless all three pass.
    pub async fn delete_managed_account(
        &self,
        caller: Option<&Caller>,
        request: DeleteManagedAccount,
    ) -> Result<DeletedManagedAccount> {
        let caller = caller.ok_or(ServiceError::Unauthenticated)?;

        let target_id = validate_id("targetAccountId", &request.target_account_id)?;
        let account_type: AccountType = request.account_type.trim().parse()?;
        let school_id = validate_id("schoolId", &request.school_id)?;

        let scope = self.authorize(caller, school_id).await?;

        let student_count_decremented = self.apply(target_id, account_type, school_id).await?;
        info!(
            caller = %caller.user_id,
            target = %target_id,
            account_type = %account_type,
            school_id = %school_id,
            scope = ?scope,
            student_count_decremented,
            "Managed account deleted"
        );

        // Only the student path removes the credential.
        let credential_cleanup = match account_type {
            AccountType::Student => remove_credential(self.credentials.as_ref(), target_id).await,
            AccountType::Teacher | AccountType::Staff => CredentialCleanup::Skipped,
        };

        Ok(DeletedManagedAccount {
            deleted_id: target_id.to_string(),
            account_type,
            scope,
            student_count_decremented,
            credential_cleanup,
        })
    }

    /// Decide whether `caller` may manage accounts in `school_id`.
    pub async fn authorize(&self, caller: &Caller, school_id: &str) -> Result<AdminScope> {
        let pool = self.db.pool();
        let Some(admin) = user::find_user(pool, &caller.user_id).await? else {
            warn!(caller = %caller.user_id, "Managed deletion by caller without a user record");
            return Err(ServiceError::PermissionDenied(
                "caller has no account".to_string(),
            ));
        };

        match admin.role {
            Role::School => {
                if admin.active_school_id.as_deref() == Some(school_id) {
                    return Ok(AdminScope::School);
                }
            }
            Role::District => {
                if let Some(district_id) = admin.district_id.as_deref() {
                    if school::district_manages_school(pool, district_id, school_id).await? {
                        return Ok(AdminScope::District);
                    }
                }
            }
            Role::Student | Role::Teacher | Role::Sub | Role::Parent => {}
        }

        warn!(
            caller = %caller.user_id,
            role = %admin.role,
            school_id = %school_id,
            "Managed deletion denied"
        );
        Err(ServiceError::PermissionDenied(format!(
            "not an admin of school {}",
            school_id
        )))
    }

    /// Run the deletion for one account type in a transaction. Returns whether
    /// the school's student count was decremented.
    async fn apply(
        &self,
        target_id: &str,
        account_type: AccountType,
        school_id: &str,
    ) -> std::result::Result<bool, DatabaseError> {
        let mut tx = self.db.begin().await?;
        let mut decremented = false;

        match account_type {
            AccountType::Student => {
                let schools = profile::delete_profiles_returning_schools(
                    &mut *tx,
                    ProfileKind::Student,
                    target_id,
                )
                .await?;
                user::delete_user(&mut *tx, target_id).await?;

                // A retry or a student enrolled elsewhere leaves the count alone.
                if schools.iter().any(|s| s.as_deref() == Some(school_id)) {
                    decremented = school::decrement_student_count(&mut *tx, school_id).await? > 0;
                } else {
                    debug!(
                        target = %target_id,
                        school_id = %school_id,
                        "No student profile removed from school; count unchanged"
                    );
                }
            }
            // Teacher accounts keep their user record.
            AccountType::Teacher => {
                profile::delete_profiles_for_user(&mut *tx, ProfileKind::Teacher, target_id).await?;
            }
            AccountType::Staff => {
                user::delete_user(&mut *tx, target_id).await?;
            }
        }

        tx.commit().await?;
        Ok(decremented)
    }
}
