//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use accounts::{CredentialError, CredentialStore, SqliteCredentialStore};
use async_trait::async_trait;
use database::{
    conversation, credential, profile, school, user, Conversation, Database, Profile, ProfileKind,
    Role, School, User,
};

pub async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    db
}

pub async fn add_user(
    db: &Database,
    id: &str,
    role: Role,
    active_school_id: Option<&str>,
    district_id: Option<&str>,
) {
    let record = User {
        id: id.to_string(),
        role,
        active_school_id: active_school_id.map(str::to_string),
        district_id: district_id.map(str::to_string),
    };
    user::create_user(db.pool(), &record).await.unwrap();
    credential::create_credential(db.pool(), id, "password")
        .await
        .unwrap();
}

pub async fn add_profile(db: &Database, kind: ProfileKind, id: &str, user_id: &str, school_id: Option<&str>) {
    let record = Profile {
        id: id.to_string(),
        user_id: user_id.to_string(),
        school_id: school_id.map(str::to_string),
        display_name: None,
    };
    profile::create_profile(db.pool(), kind, &record).await.unwrap();
}

pub async fn add_school(db: &Database, id: &str, student_count: i64) {
    let record = School {
        id: id.to_string(),
        name: format!("School {}", id),
        student_count,
    };
    school::create_school(db.pool(), &record).await.unwrap();
}

pub async fn add_conversation(db: &Database, id: &str, participants: &[&str]) {
    let record = Conversation {
        id: id.to_string(),
        participant_ids: participants.iter().map(|p| p.to_string()).collect(),
    };
    conversation::create_conversation(db.pool(), &record).await.unwrap();
}

/// Make the next statement that deletes from `table` fail, aborting its transaction.
pub async fn fail_deletes_on(db: &Database, table: &str) {
    let trigger = format!(
        "CREATE TRIGGER fail_delete_{table} BEFORE DELETE ON {table} \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;"
    );
    sqlx::query(&trigger).execute(db.pool()).await.unwrap();
}

/// Make any update to `schools` fail.
pub async fn fail_school_updates(db: &Database) {
    sqlx::query(
        "CREATE TRIGGER fail_school_update BEFORE UPDATE ON schools \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    )
    .execute(db.pool())
    .await
    .unwrap();
}

/// Credential store that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialStore for RecordingStore {
    async fn delete_credential(&self, user_id: &str) -> Result<(), CredentialError> {
        self.calls.lock().unwrap().push(user_id.to_string());
        if self.fail {
            return Err(CredentialError::Store("identity provider unavailable".to_string()));
        }
        Ok(())
    }
}

pub fn sqlite_store(db: &Database) -> Arc<SqliteCredentialStore> {
    Arc::new(SqliteCredentialStore::new(db.clone()))
}
