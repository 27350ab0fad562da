use std::fmt;

use sqlx::PgPool;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;

/// Record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Mentor,
    Student,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Mentor => f.write_str("Mentor"),
            Entity::Student => f.write_str("Student"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with email {email} already exists")]
    DuplicateEmail { entity: Entity, email: String },
    #[error("{entity} {id} does not exist")]
    Missing { entity: Entity, id: Uuid },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps a unique-index violation on `email` to `DuplicateEmail`.
    pub(crate) fn from_insert(err: sqlx::Error, entity: Entity, email: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail {
                entity,
                email: email.to_string(),
            },
            _ => StoreError::Database(err),
        }
    }
}

/// PostgreSQL-backed store. Implements both repository traits.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}
