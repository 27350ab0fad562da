use axum::async_trait;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewStudent, Student};
use crate::mentors::repo::MENTOR_COLUMNS;
use crate::mentors::repo_types::{Mentor, MentorRow};
use crate::storage::{Entity, PgStore, StoreError};

pub(crate) const STUDENT_COLUMNS: &str = "id, first_name, last_name, email, date_of_birth, \
     phone, courses, mentor_id, created_at, updated_at";

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a student without a mentor; fails with `DuplicateEmail` if the email is taken.
    async fn create(&self, new: NewStudent) -> Result<Student, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Student>, StoreError>;

    async fn list_without_mentor(&self) -> Result<Vec<Student>, StoreError>;

    /// `Missing` if the student does not exist, `Ok(None)` if it has no
    /// (resolvable) mentor.
    async fn get_mentor_of(&self, student_id: Uuid) -> Result<Option<Mentor>, StoreError>;
}

#[async_trait]
impl StudentRepository for PgStore {
    async fn create(&self, new: NewStudent) -> Result<Student, StoreError> {
        let now = OffsetDateTime::now_utc();
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (id, first_name, last_name, email, date_of_birth, phone, courses,
                                  mentor_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, $8, $8)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(new.date_of_birth)
        .bind(&new.phone)
        .bind(&new.courses)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::from_insert(e, Entity::Student, &new.email))?;
        Ok(student)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(student)
    }

    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY created_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_without_mentor(&self) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE mentor_id IS NULL ORDER BY created_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_mentor_of(&self, student_id: Uuid) -> Result<Option<Mentor>, StoreError> {
        let Some(student) = self.get_by_id(student_id).await? else {
            return Err(StoreError::Missing {
                entity: Entity::Student,
                id: student_id,
            });
        };
        let Some(mentor_id) = student.mentor else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, MentorRow>(&format!(
            "SELECT {MENTOR_COLUMNS} FROM mentors WHERE id = $1"
        ))
        .bind(mentor_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Mentor::from))
    }
}

// ---- Transactional writes ----

/// Load the student and hold its row lock until the transaction ends, so
/// concurrent transfers of the same student run one after the other.
pub async fn lock_student_tx(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
) -> Result<Option<Student>, StoreError> {
    let student = sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 FOR UPDATE"
    ))
    .bind(student_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(student)
}

pub async fn set_mentor_tx(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    mentor_id: Uuid,
) -> Result<Student, StoreError> {
    let saved = sqlx::query_as::<_, Student>(&format!(
        r#"
        UPDATE students
           SET mentor_id = $2, updated_at = now()
         WHERE id = $1
        RETURNING {STUDENT_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(mentor_id)
    .fetch_optional(&mut **tx)
    .await?;
    saved.ok_or(StoreError::Missing {
        entity: Entity::Student,
        id: student_id,
    })
}
