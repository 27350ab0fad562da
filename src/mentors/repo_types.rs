use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Mentor record as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub bio: String,
    pub phone: String,
    pub students: BTreeSet<Uuid>, // ids of supervised students
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated input for a new mentor.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMentor {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub bio: String,
    pub phone: String,
}

#[derive(Debug, FromRow)]
pub struct MentorRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub bio: String,
    pub phone: String,
    pub students: Vec<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<MentorRow> for Mentor {
    fn from(r: MentorRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            skills: r.skills,
            bio: r.bio,
            phone: r.phone,
            students: r.students.into_iter().collect(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
