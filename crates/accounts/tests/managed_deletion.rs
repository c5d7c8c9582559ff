//! Integration tests for admin-initiated deletion of managed accounts.

mod common;

use std::sync::Arc;

use accounts::{
    AdminScope, Caller, CredentialCleanup, DeleteManagedAccount, ManagedAccountDeletion,
    ServiceError, ValidationError,
};
use common::*;
use database::{credential, profile, school, user, Database, ProfileKind, Role};

fn request(target: &str, account_type: &str, school_id: &str) -> DeleteManagedAccount {
    DeleteManagedAccount {
        target_account_id: target.to_string(),
        account_type: account_type.to_string(),
        school_id: school_id.to_string(),
    }
}

/// Two schools, admins for each, a district admin over "s1", and one student,
/// teacher and staff member in "s1".
async fn seed(db: &Database) {
    add_school(db, "s1", 30).await;
    add_school(db, "s2", 12).await;
    school::grant_district_school(db.pool(), "d1", "s1").await.unwrap();

    add_user(db, "admin-s1", Role::School, Some("s1"), None).await;
    add_user(db, "admin-s2", Role::School, Some("s2"), None).await;
    add_user(db, "district-d1", Role::District, None, Some("d1")).await;
    add_user(db, "district-none", Role::District, None, None).await;

    add_user(db, "st-1", Role::Student, Some("s1"), None).await;
    add_profile(db, ProfileKind::Student, "stp-1", "st-1", Some("s1")).await;

    add_user(db, "t-1", Role::Teacher, Some("s1"), None).await;
    add_profile(db, ProfileKind::Teacher, "tp-1", "t-1", Some("s1")).await;

    add_user(db, "sf-1", Role::Teacher, Some("s1"), None).await;
    add_profile(db, ProfileKind::Staff, "sfp-1", "sf-1", Some("s1")).await;
}

async fn student_count(db: &Database, school_id: &str) -> i64 {
    school::get_school(db.pool(), school_id)
        .await
        .unwrap()
        .student_count
}

async fn assert_student_intact(db: &Database) {
    assert!(user::find_user(db.pool(), "st-1").await.unwrap().is_some());
    assert_eq!(
        profile::list_profiles_for_user(db.pool(), ProfileKind::Student, "st-1")
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(student_count(db, "s1").await, 30);
}

#[tokio::test]
async fn test_school_admin_deletes_student() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));

    let deleted = service
        .delete_managed_account(
            Some(&Caller::new("admin-s1")),
            request("st-1", "student", "s1"),
        )
        .await
        .unwrap();

    assert_eq!(deleted.deleted_id, "st-1");
    assert_eq!(deleted.scope, AdminScope::School);
    assert_eq!(deleted.credential_cleanup, CredentialCleanup::Removed);

    assert!(user::find_user(db.pool(), "st-1").await.unwrap().is_none());
    assert!(profile::list_profiles_for_user(db.pool(), ProfileKind::Student, "st-1")
        .await
        .unwrap()
        .is_empty());
    assert_eq!(student_count(&db, "s1").await, 29);
    assert_eq!(student_count(&db, "s2").await, 12);
    assert!(credential::get_credential(db.pool(), "st-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_school_admin_of_other_school_is_denied() {
    let db = test_db().await;
    seed(&db).await;
    let store = Arc::new(RecordingStore::default());
    let service = ManagedAccountDeletion::new(db.clone(), store.clone());

    let result = service
        .delete_managed_account(
            Some(&Caller::new("admin-s2")),
            request("st-1", "student", "s1"),
        )
        .await;

    assert!(matches!(result, Err(ServiceError::PermissionDenied(_))));
    assert_student_intact(&db).await;
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_district_admin_with_grant() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));

    let deleted = service
        .delete_managed_account(
            Some(&Caller::new("district-d1")),
            request("st-1", "student", "s1"),
        )
        .await
        .unwrap();

    assert_eq!(deleted.scope, AdminScope::District);
    assert_eq!(student_count(&db, "s1").await, 29);
}

#[tokio::test]
async fn test_district_admin_without_grant_is_denied() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));

    let outside = service
        .delete_managed_account(
            Some(&Caller::new("district-d1")),
            request("st-1", "student", "s2"),
        )
        .await;
    assert!(matches!(outside, Err(ServiceError::PermissionDenied(_))));

    let no_district = service
        .delete_managed_account(
            Some(&Caller::new("district-none")),
            request("st-1", "student", "s1"),
        )
        .await;
    assert!(matches!(no_district, Err(ServiceError::PermissionDenied(_))));

    assert_student_intact(&db).await;
    assert_eq!(student_count(&db, "s2").await, 12);
}

#[tokio::test]
async fn test_non_admin_roles_are_denied() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));

    // A teacher whose active school matches is still not an admin.
    let result = service
        .delete_managed_account(Some(&Caller::new("t-1")), request("st-1", "student", "s1"))
        .await;
    assert!(matches!(result, Err(ServiceError::PermissionDenied(_))));

    let unknown = service
        .delete_managed_account(Some(&Caller::new("ghost")), request("st-1", "student", "s1"))
        .await;
    assert!(matches!(unknown, Err(ServiceError::PermissionDenied(_))));

    assert_student_intact(&db).await;
}

#[tokio::test]
async fn test_teacher_path_keeps_user_record() {
    let db = test_db().await;
    seed(&db).await;
    let store = Arc::new(RecordingStore::default());
    let service = ManagedAccountDeletion::new(db.clone(), store.clone());

    let deleted = service
        .delete_managed_account(
            Some(&Caller::new("admin-s1")),
            request("t-1", "teacher", "s1"),
        )
        .await
        .unwrap();

    assert_eq!(deleted.credential_cleanup, CredentialCleanup::Skipped);
    assert!(profile::list_profiles_for_user(db.pool(), ProfileKind::Teacher, "t-1")
        .await
        .unwrap()
        .is_empty());
    assert!(user::find_user(db.pool(), "t-1").await.unwrap().is_some());
    assert_eq!(student_count(&db, "s1").await, 30);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_staff_path_deletes_only_user_record() {
    let db = test_db().await;
    seed(&db).await;
    let store = Arc::new(RecordingStore::default());
    let service = ManagedAccountDeletion::new(db.clone(), store.clone());

    let deleted = service
        .delete_managed_account(
            Some(&Caller::new("admin-s1")),
            request("sf-1", "staff", "s1"),
        )
        .await
        .unwrap();

    assert_eq!(deleted.credential_cleanup, CredentialCleanup::Skipped);
    assert!(user::find_user(db.pool(), "sf-1").await.unwrap().is_none());
    assert_eq!(
        profile::list_profiles_for_user(db.pool(), ProfileKind::Staff, "sf-1")
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(credential::get_credential(db.pool(), "sf-1").await.unwrap().is_some());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_unrecognized_account_type_rejected_before_authorization() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));

    // Even a caller who would be denied gets the argument error first.
    let result = service
        .delete_managed_account(
            Some(&Caller::new("admin-s2")),
            request("st-1", "principal", "s1"),
        )
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::InvalidArgument(ValidationError::Unrecognized { .. }))
    ));

    let empty_target = service
        .delete_managed_account(Some(&Caller::new("admin-s1")), request(" ", "student", "s1"))
        .await;
    assert!(matches!(empty_target, Err(ServiceError::InvalidArgument(_))));

    assert_student_intact(&db).await;
}

#[tokio::test]
async fn test_unauthenticated_caller_rejected_first() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));

    let result = service
        .delete_managed_account(None, request("st-1", "principal", ""))
        .await;
    assert!(matches!(result, Err(ServiceError::Unauthenticated)));
    assert_student_intact(&db).await;
}

#[tokio::test]
async fn test_failed_counter_update_rolls_back_student_deletion() {
    let db = test_db().await;
    seed(&db).await;
    fail_school_updates(&db).await;
    let store = Arc::new(RecordingStore::default());
    let service = ManagedAccountDeletion::new(db.clone(), store.clone());

    let result = service
        .delete_managed_account(
            Some(&Caller::new("admin-s1")),
            request("st-1", "student", "s1"),
        )
        .await;

    assert!(matches!(result, Err(ServiceError::Internal(_))));
    assert_student_intact(&db).await;
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_credential_failure_does_not_fail_student_deletion() {
    let db = test_db().await;
    seed(&db).await;
    let store = RecordingStore::failing();
    let service = ManagedAccountDeletion::new(db.clone(), store.clone());

    let deleted = service
        .delete_managed_account(
            Some(&Caller::new("admin-s1")),
            request("st-1", "student", "s1"),
        )
        .await
        .unwrap();

    assert_eq!(deleted.credential_cleanup, CredentialCleanup::Failed);
    assert_eq!(store.calls(), vec!["st-1".to_string()]);
    assert!(user::find_user(db.pool(), "st-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_student_leaves_count_alone() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));
    let admin = Caller::new("admin-s1");

    for _ in 0..2 {
        let deleted = service
            .delete_managed_account(Some(&admin), request("ghost", "student", "s1"))
            .await
            .unwrap();
        assert!(!deleted.student_count_decremented);
    }

    assert_student_intact(&db).await;
}

#[tokio::test]
async fn test_repeated_student_deletion_decrements_once() {
    let db = test_db().await;
    seed(&db).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));
    let admin = Caller::new("admin-s1");

    let first = service
        .delete_managed_account(Some(&admin), request("st-1", "student", "s1"))
        .await
        .unwrap();
    assert!(first.student_count_decremented);

    let retry = service
        .delete_managed_account(Some(&admin), request("st-1", "student", "s1"))
        .await
        .unwrap();
    assert!(!retry.student_count_decremented);

    assert_eq!(student_count(&db, "s1").await, 29);
}

#[tokio::test]
async fn test_student_enrolled_elsewhere_leaves_count_alone() {
    let db = test_db().await;
    seed(&db).await;
    add_user(&db, "st-2", Role::Student, Some("s2"), None).await;
    add_profile(&db, ProfileKind::Student, "stp-2", "st-2", Some("s2")).await;
    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));

    let deleted = service
        .delete_managed_account(
            Some(&Caller::new("admin-s1")),
            request("st-2", "student", "s1"),
        )
        .await
        .unwrap();

    assert!(!deleted.student_count_decremented);
    assert_eq!(student_count(&db, "s1").await, 30);
    assert_eq!(student_count(&db, "s2").await, 12);
}

#[tokio::test]
async fn test_concurrent_student_deletions_decrement_exactly() {
    const STUDENTS: usize = 12;

    let db = Database::connect_with_pool_size("sqlite::memory:", 4)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    add_school(&db, "s1", 100).await;
    add_user(&db, "admin-s1", Role::School, Some("s1"), None).await;
    for i in 0..STUDENTS {
        let id = format!("st-{}", i);
        add_user(&db, &id, Role::Student, Some("s1"), None).await;
        add_profile(&db, ProfileKind::Student, &format!("stp-{}", i), &id, Some("s1")).await;
    }

    let service = ManagedAccountDeletion::new(db.clone(), sqlite_store(&db));
    let tasks = (0..STUDENTS).map(|i| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .delete_managed_account(
                    Some(&Caller::new("admin-s1")),
                    request(&format!("st-{}", i), "student", "s1"),
                )
                .await
        })
    });

    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(student_count(&db, "s1").await, 100 - STUDENTS as i64);
    assert_eq!(user::count_users(db.pool()).await.unwrap(), 1);
}
