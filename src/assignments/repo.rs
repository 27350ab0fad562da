use axum::async_trait;
use uuid::Uuid;

use super::repo_types::{Assignment, AssignmentError, DanglingPolicy};
use crate::mentors::repo::{attach_student_tx, detach_student_tx, lock_mentors_tx};
use crate::storage::{Entity, PgStore};
use crate::students::repo::{lock_student_tx, set_mentor_tx};

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Point the student at `mentor_id` and keep both mentor sets in step,
    /// as one unit: either every write lands or none does.
    async fn transfer(
        &self,
        student_id: Uuid,
        mentor_id: Uuid,
        on_dangling: DanglingPolicy,
    ) -> Result<Assignment, AssignmentError>;
}

#[async_trait]
impl AssignmentRepository for PgStore {
    async fn transfer(
        &self,
        student_id: Uuid,
        mentor_id: Uuid,
        on_dangling: DanglingPolicy,
    ) -> Result<Assignment, AssignmentError> {
        let mut tx = self.db.begin().await?;

        let student = lock_student_tx(&mut tx, student_id)
            .await?
            .ok_or(AssignmentError::NotFound(Entity::Student))?;
        let previous = student.mentor.filter(|id| *id != mentor_id);
        let wanted: Vec<Uuid> = std::iter::once(mentor_id).chain(previous).collect();
        let present = lock_mentors_tx(&mut tx, &wanted).await?;
        if !present.contains(&mentor_id) {
            return Err(AssignmentError::NotFound(Entity::Mentor));
        }

        if let Some(prev_id) = previous {
            if present.contains(&prev_id) {
                detach_student_tx(&mut tx, prev_id, student_id).await?;
            } else {
                on_dangling.on_missing(student_id, prev_id)?;
            }
        }

        let student = set_mentor_tx(&mut tx, student_id, mentor_id).await?;
        let mentor = attach_student_tx(&mut tx, mentor_id, student_id).await?;

        tx.commit().await?;
        Ok(Assignment { student, mentor })
    }
}
