//! Integration tests for self-service account deletion.

mod common;

use std::sync::Arc;

use accounts::{AccountDeletion, Caller, CredentialCleanup, ServiceError};
use common::*;
use database::{
    conversation, credential, lesson_plan, parent_link, profile, support_claim, user, Database,
    LessonPlan, ProfileKind, Role, SupportClaim,
};

/// A teacher with every kind of dependent record, plus a bystander.
async fn seed_teacher(db: &Database) {
    add_user(db, "t1", Role::Teacher, Some("s1"), None).await;
    add_profile(db, ProfileKind::Teacher, "tp-1", "t1", Some("s1")).await;
    add_profile(db, ProfileKind::Teacher, "tp-repair", "t1", Some("s1")).await;

    add_user(db, "other", Role::Teacher, Some("s1"), None).await;
    add_profile(db, ProfileKind::Teacher, "tp-other", "other", Some("s1")).await;

    add_conversation(db, "direct", &["t1", "other"]).await;
    add_conversation(db, "group", &["t1", "other", "st-9"]).await;
    add_conversation(db, "unrelated", &["other", "st-9"]).await;

    for (id, teacher) in [("lp-1", "t1"), ("lp-2", "t1"), ("lp-other", "other")] {
        lesson_plan::create_lesson_plan(
            db.pool(),
            &LessonPlan {
                id: id.to_string(),
                teacher_id: teacher.to_string(),
                title: "Number sense".to_string(),
            },
        )
        .await
        .unwrap();
    }

    support_claim::create_support_claim(
        db.pool(),
        &SupportClaim {
            id: "sc-1".to_string(),
            user_id: "t1".to_string(),
            subject: "Gradebook sync".to_string(),
        },
    )
    .await
    .unwrap();
}

/// Everything that should be gone after "t1" is deleted is still present.
async fn assert_teacher_intact(db: &Database) {
    let pool = db.pool();
    assert!(user::find_user(pool, "t1").await.unwrap().is_some());
    assert_eq!(
        profile::list_profiles_for_user(pool, ProfileKind::Teacher, "t1")
            .await
            .unwrap()
            .len(),
        2
    );
    assert!(conversation::get_conversation(pool, "direct").await.unwrap().is_some());
    assert_eq!(lesson_plan::list_ids_for_teacher(pool, "t1").await.unwrap().len(), 2);
    assert_eq!(support_claim::list_ids_for_user(pool, "t1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_teacher_cascade() {
    let db = test_db().await;
    seed_teacher(&db).await;
    let service = AccountDeletion::new(db.clone(), sqlite_store(&db));

    let deleted = service
        .delete_own_account(Some(&Caller::new("t1")))
        .await
        .unwrap();
    assert_eq!(deleted.deleted_user_id, "t1");
    assert_eq!(deleted.credential_cleanup, CredentialCleanup::Removed);

    let pool = db.pool();
    assert!(user::find_user(pool, "t1").await.unwrap().is_none());
    assert!(profile::list_profiles_for_user(pool, ProfileKind::Teacher, "t1")
        .await
        .unwrap()
        .is_empty());
    assert!(conversation::get_conversation(pool, "direct").await.unwrap().is_none());
    assert!(lesson_plan::list_ids_for_teacher(pool, "t1").await.unwrap().is_empty());
    assert!(support_claim::list_ids_for_user(pool, "t1").await.unwrap().is_empty());
    assert!(credential::get_credential(pool, "t1").await.unwrap().is_none());

    // The group conversation survives with a stale participant id.
    let group = conversation::get_conversation(pool, "group").await.unwrap().unwrap();
    assert_eq!(group.participant_ids, vec!["t1", "other", "st-9"]);

    // Nobody else's records are touched.
    assert!(user::find_user(pool, "other").await.unwrap().is_some());
    assert_eq!(
        profile::list_profiles_for_user(pool, ProfileKind::Teacher, "other")
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(conversation::get_conversation(pool, "unrelated").await.unwrap().is_some());
    assert_eq!(
        lesson_plan::list_ids_for_teacher(pool, "other").await.unwrap(),
        vec!["lp-other".to_string()]
    );
    assert!(credential::get_credential(pool, "other").await.unwrap().is_some());
}

#[tokio::test]
async fn test_parent_cascade_removes_links() {
    let db = test_db().await;
    add_user(&db, "p1", Role::Parent, None, None).await;
    add_profile(&db, ProfileKind::Parent, "pp-1", "p1", None).await;
    parent_link::create_link(db.pool(), "p1", "st-1").await.unwrap();
    parent_link::create_link(db.pool(), "p1", "st-2").await.unwrap();
    parent_link::create_link(db.pool(), "p2", "st-1").await.unwrap();

    let service = AccountDeletion::new(db.clone(), sqlite_store(&db));
    service
        .delete_own_account(Some(&Caller::new("p1")))
        .await
        .unwrap();

    let pool = db.pool();
    assert!(profile::list_profiles_for_user(pool, ProfileKind::Parent, "p1")
        .await
        .unwrap()
        .is_empty());
    assert!(parent_link::list_links_for_parent(pool, "p1").await.unwrap().is_empty());
    assert_eq!(parent_link::list_links_for_parent(pool, "p2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_batch_leaves_everything_in_place() {
    let db = test_db().await;
    seed_teacher(&db).await;
    // Profiles, the user and the direct conversation are deleted before lesson plans.
    fail_deletes_on(&db, "lesson_plans").await;

    let store = Arc::new(RecordingStore::default());
    let service = AccountDeletion::new(db.clone(), store.clone());

    let result = service.delete_own_account(Some(&Caller::new("t1"))).await;
    assert!(matches!(result, Err(ServiceError::Internal(_))));

    assert_teacher_intact(&db).await;
    assert!(store.calls().is_empty(), "credential must not be touched");
}

#[tokio::test]
async fn test_failure_at_first_delete_leaves_everything_in_place() {
    let db = test_db().await;
    seed_teacher(&db).await;
    fail_deletes_on(&db, "teachers").await;

    let store = Arc::new(RecordingStore::default());
    let service = AccountDeletion::new(db.clone(), store.clone());

    assert!(service.delete_own_account(Some(&Caller::new("t1"))).await.is_err());
    assert_teacher_intact(&db).await;
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_credential_failure_does_not_fail_deletion() {
    let db = test_db().await;
    seed_teacher(&db).await;
    let store = RecordingStore::failing();
    let service = AccountDeletion::new(db.clone(), store.clone());

    let deleted = service
        .delete_own_account(Some(&Caller::new("t1")))
        .await
        .unwrap();
    assert_eq!(deleted.deleted_user_id, "t1");
    assert_eq!(deleted.credential_cleanup, CredentialCleanup::Failed);
    assert_eq!(store.calls(), vec!["t1".to_string()]);

    assert!(user::find_user(db.pool(), "t1").await.unwrap().is_none());
    assert!(lesson_plan::list_ids_for_teacher(db.pool(), "t1")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_deleting_twice_is_idempotent() {
    let db = test_db().await;
    seed_teacher(&db).await;
    let service = AccountDeletion::new(db.clone(), sqlite_store(&db));
    let caller = Caller::new("t1");

    let first = service.delete_own_account(Some(&caller)).await.unwrap();
    let users_after_first = user::count_users(db.pool()).await.unwrap();

    let second = service.delete_own_account(Some(&caller)).await.unwrap();
    assert_eq!(first.deleted_user_id, second.deleted_user_id);
    // The credential is already gone; the retry still tries and shrugs it off.
    assert_eq!(second.credential_cleanup, CredentialCleanup::Failed);

    assert_eq!(user::count_users(db.pool()).await.unwrap(), users_after_first);
    let group = conversation::get_conversation(db.pool(), "group").await.unwrap();
    assert!(group.is_some());
}

#[tokio::test]
async fn test_conversation_removed_only_when_direct() {
    let db = test_db().await;
    add_user(&db, "u1", Role::Student, Some("s1"), None).await;
    add_conversation(&db, "pair", &["u1", "u2"]).await;
    add_conversation(&db, "trio", &["u2", "u1", "u3"]).await;
    add_conversation(&db, "quartet", &["u1", "u2", "u3", "u4"]).await;

    let service = AccountDeletion::new(db.clone(), sqlite_store(&db));
    service
        .delete_own_account(Some(&Caller::new("u1")))
        .await
        .unwrap();

    let pool = db.pool();
    assert!(conversation::get_conversation(pool, "pair").await.unwrap().is_none());
    assert!(conversation::get_conversation(pool, "trio").await.unwrap().is_some());
    assert!(conversation::get_conversation(pool, "quartet").await.unwrap().is_some());
}

#[tokio::test]
async fn test_unauthenticated_caller_touches_nothing() {
    let db = test_db().await;
    seed_teacher(&db).await;
    let store = Arc::new(RecordingStore::default());
    let service = AccountDeletion::new(db.clone(), store.clone());

    let result = service.delete_own_account(None).await;
    assert!(matches!(result, Err(ServiceError::Unauthenticated)));
    assert_teacher_intact(&db).await;
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_only_the_callers_account_is_deleted() {
    let db = test_db().await;
    seed_teacher(&db).await;
    let service = AccountDeletion::new(db.clone(), sqlite_store(&db));

    let deleted = service
        .delete_own_account(Some(&Caller::new("other")))
        .await
        .unwrap();
    assert_eq!(deleted.deleted_user_id, "other");

    // "t1" shared a direct conversation with "other", which goes; the rest stays.
    let pool = db.pool();
    assert!(user::find_user(pool, "t1").await.unwrap().is_some());
    assert_eq!(lesson_plan::list_ids_for_teacher(pool, "t1").await.unwrap().len(), 2);
    assert!(credential::get_credential(pool, "t1").await.unwrap().is_some());
}
