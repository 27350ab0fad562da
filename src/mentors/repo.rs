use axum::async_trait;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Mentor, MentorRow, NewMentor};
use crate::storage::{Entity, PgStore, StoreError};
use crate::students::repo::STUDENT_COLUMNS;
use crate::students::repo_types::Student;

pub(crate) const MENTOR_COLUMNS: &str =
    "id, name, email, skills, bio, phone, students, created_at, updated_at";

#[async_trait]
pub trait MentorRepository: Send + Sync {
    /// Insert a mentor; fails with `DuplicateEmail` if the email is taken.
    async fn create(&self, new: NewMentor) -> Result<Mentor, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Mentor>, StoreError>;

    /// Resolve the mentor's student set into full records.
    async fn list_students_of(&self, mentor_id: Uuid) -> Result<Vec<Student>, StoreError>;
}

#[async_trait]
impl MentorRepository for PgStore {
    async fn create(&self, new: NewMentor) -> Result<Mentor, StoreError> {
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, MentorRow>(&format!(
            r#"
            INSERT INTO mentors (id, name, email, skills, bio, phone, students,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, '{{}}', $7, $7)
            RETURNING {MENTOR_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.skills)
        .bind(&new.bio)
        .bind(&new.phone)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::from_insert(e, Entity::Mentor, &new.email))?;
        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Mentor>, StoreError> {
        let row = sqlx::query_as::<_, MentorRow>(&format!(
            "SELECT {MENTOR_COLUMNS} FROM mentors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Mentor::from))
    }

    async fn list_students_of(&self, mentor_id: Uuid) -> Result<Vec<Student>, StoreError> {
        let Some(mentor) = self.get_by_id(mentor_id).await? else {
            return Err(StoreError::Missing {
                entity: Entity::Mentor,
                id: mentor_id,
            });
        };
        let ids: Vec<Uuid> = mentor.students.into_iter().collect();
        let students = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
              FROM students
             WHERE id = ANY($1)
             ORDER BY created_at ASC
            "#
        ))
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;
        Ok(students)
    }
}

// ---- Transactional writes ----

/// Lock the given mentor rows in id order and return the ids that exist.
/// A fixed order keeps two transfers over the same mentors from deadlocking.
pub async fn lock_mentors_tx(
    tx: &mut Transaction<'_, Postgres>,
    mentor_ids: &[Uuid],
) -> Result<Vec<Uuid>, StoreError> {
    let found: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id
          FROM mentors
         WHERE id = ANY($1)
         ORDER BY id
           FOR UPDATE
        "#,
    )
    .bind(mentor_ids)
    .fetch_all(&mut **tx)
    .await?;
    Ok(found)
}

/// Add the student to the mentor's set in place. Idempotent.
pub async fn attach_student_tx(
    tx: &mut Transaction<'_, Postgres>,
    mentor_id: Uuid,
    student_id: Uuid,
) -> Result<Mentor, StoreError> {
    let row = sqlx::query_as::<_, MentorRow>(&format!(
        r#"
        UPDATE mentors
           SET students = array_append(array_remove(students, $2), $2),
               updated_at = now()
         WHERE id = $1
        RETURNING {MENTOR_COLUMNS}
        "#
    ))
    .bind(mentor_id)
    .bind(student_id)
    .fetch_optional(&mut **tx)
    .await?;
    row.map(Mentor::from).ok_or(StoreError::Missing {
        entity: Entity::Mentor,
        id: mentor_id,
    })
}

/// Remove the student from the mentor's set in place. Returns whether the
/// set held it.
pub async fn detach_student_tx(
    tx: &mut Transaction<'_, Postgres>,
    mentor_id: Uuid,
    student_id: Uuid,
) -> Result<bool, StoreError> {
    let done = sqlx::query(
        r#"
        UPDATE mentors
           SET students = array_remove(students, $2),
               updated_at = now()
         WHERE id = $1 AND $2 = ANY(students)
        "#,
    )
    .bind(mentor_id)
    .bind(student_id)
    .execute(&mut **tx)
    .await?;
    Ok(done.rows_affected() > 0)
}
