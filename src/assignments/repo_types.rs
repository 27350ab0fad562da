use tracing::warn;
use uuid::Uuid;

use crate::{
    mentors::repo_types::Mentor,
    storage::{Entity, StoreError},
    students::repo_types::Student,
};

/// Both sides of an association after a successful change.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub student: Student,
    pub mentor: Mentor,
}

#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("student {student} references mentor {mentor}, which does not exist")]
    DanglingMentor { student: Uuid, mentor: Uuid },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for AssignmentError {
    fn from(err: sqlx::Error) -> Self {
        AssignmentError::Store(err.into())
    }
}

/// What to do when the student's previous mentor record is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanglingPolicy {
    Skip,
    Fail,
}

impl DanglingPolicy {
    pub fn on_missing(self, student: Uuid, mentor: Uuid) -> Result<(), AssignmentError> {
        match self {
            DanglingPolicy::Fail => Err(AssignmentError::DanglingMentor { student, mentor }),
            DanglingPolicy::Skip => {
                warn!(
                    student_id = %student,
                    mentor_id = %mentor,
                    "previous mentor missing; skipping detach"
                );
                Ok(())
            }
        }
    }
}
