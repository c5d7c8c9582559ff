//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role stored on a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Learner.
    Student,
    /// Classroom teacher.
    Teacher,
    /// Substitute or paraeducator.
    Sub,
    /// Parent or guardian.
    Parent,
    /// School administrator.
    School,
    /// District administrator.
    District,
}

impl Role {
    /// Value stored in the `role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Sub => "sub",
            Role::Parent => "parent",
            Role::School => "school",
            Role::District => "district",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "sub" => Ok(Role::Sub),
            "parent" => Ok(Role::Parent),
            "school" => Ok(Role::School),
            "district" => Ok(Role::District),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// A user in the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identity id.
    pub id: String,
    /// Account role.
    pub role: Role,
    /// School the user currently acts for (school admins, staff, students).
    pub active_school_id: Option<String>,
    /// District the user belongs to (district admins).
    pub district_id: Option<String>,
}

/// Raw `users` row before the role column is decoded.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub role: String,
    pub active_school_id: Option<String>,
    pub district_id: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = crate::DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|reason| crate::DatabaseError::InvalidRecord {
                entity: "User",
                id: row.id.clone(),
                reason,
            })?;

        Ok(User {
            id: row.id,
            role,
            active_school_id: row.active_school_id,
            district_id: row.district_id,
        })
    }
}

/// A school and its enrolment counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct School {
    pub id: String,
    pub name: String,
    pub student_count: i64,
}

/// A role-specific profile (teacher, sub, parent, student or staff).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Profile id (distinct from the user id).
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// School the profile is attached to, if any.
    pub school_id: Option<String>,
    /// Name shown in rosters.
    pub display_name: Option<String>,
}

/// Join record between a parent user and a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ParentStudentLink {
    pub id: i64,
    pub parent_user_id: String,
    pub student_id: String,
}

/// A conversation with its ordered participant ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub participant_ids: Vec<String>,
}

/// A conversation a user takes part in, with its total participant count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationMembership {
    pub conversation_id: String,
    pub participant_count: i64,
}

/// A lesson plan authored by one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LessonPlan {
    pub id: String,
    pub teacher_id: String,
    pub title: String,
}

/// A support claim filed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SupportClaim {
    pub id: String,
    pub user_id: String,
    pub subject: String,
}

/// An authentication credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Credential {
    pub user_id: String,
    /// Sign-in provider (e.g. "password", "google").
    pub provider: String,
    pub created_at: String,
}

/// One completed play, as stored in the append-only score log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ScoreEvent {
    /// Auto-incrementing ID.
    pub id: i64,
    pub game_id: String,
    pub user_id: String,
    pub score: i64,
    /// Display name snapshot taken at submission time.
    pub display_name: Option<String>,
    pub elapsed_seconds: Option<i64>,
    /// Server timestamp, unix milliseconds (UTC).
    pub created_at_ms: i64,
}

/// A score event that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScoreEvent {
    pub game_id: String,
    pub user_id: String,
    pub score: i64,
    pub display_name: Option<String>,
    pub elapsed_seconds: Option<i64>,
    pub created_at_ms: i64,
}
