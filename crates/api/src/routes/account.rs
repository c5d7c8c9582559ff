//! Account deletion routes.

use accounts::{DeleteManagedAccount, ServiceError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::MaybeCaller;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedAccountResponse {
    pub deleted_user_id: String,
}

/// Body of a managed deletion; the school comes from the path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDeletionBody {
    #[serde(default)]
    pub target_account_id: String,
    #[serde(default)]
    pub account_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedManagedAccountResponse {
    pub deleted_id: String,
    pub account_type: String,
}

/// Delete the caller's own account.
pub async fn delete_own_account(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
) -> Result<Json<DeletedAccountResponse>> {
    let deleted = state.deletion.delete_own_account(caller.as_ref()).await?;

    Ok(Json(DeletedAccountResponse {
        deleted_user_id: deleted.deleted_user_id,
    }))
}

/// Delete a student, teacher or staff account of a school.
pub async fn delete_managed_account(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
    Path(school_id): Path<String>,
    payload: std::result::Result<Json<ManagedDeletionBody>, JsonRejection>,
) -> Result<Json<DeletedManagedAccountResponse>> {
    // Authentication is reported before anything about the body.
    let caller = caller.ok_or(ServiceError::Unauthenticated)?;
    let Json(body) = payload?;

    let request = DeleteManagedAccount {
        target_account_id: body.target_account_id,
        account_type: body.account_type,
        school_id,
    };
    let deleted = state
        .managed
        .delete_managed_account(Some(&caller), request)
        .await?;

    Ok(Json(DeletedManagedAccountResponse {
        deleted_id: deleted.deleted_id,
        account_type: deleted.account_type.to_string(),
    }))
}
