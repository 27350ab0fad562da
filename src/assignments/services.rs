use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    repo::AssignmentRepository,
    repo_types::{Assignment, AssignmentError, DanglingPolicy},
};
use crate::state::AppState;

/// Sole writer of the student/mentor association. Keeps `Student::mentor`
/// and `Mentor::students` in step.
#[derive(Clone)]
pub struct AssignmentService {
    repo: Arc<dyn AssignmentRepository>,
}

impl FromRef<AppState> for AssignmentService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.assignments.clone())
    }
}

impl AssignmentService {
    pub fn new(repo: Arc<dyn AssignmentRepository>) -> Self {
        Self { repo }
    }

    /// Point the student at `mentor_id`. A stale entry in a previous
    /// mentor's set is removed when that mentor still exists.
    #[instrument(skip(self))]
    pub async fn assign(
        &self,
        student_id: Uuid,
        mentor_id: Uuid,
    ) -> Result<Assignment, AssignmentError> {
        let out = self
            .repo
            .transfer(student_id, mentor_id, DanglingPolicy::Skip)
            .await?;
        info!(%student_id, %mentor_id, "student assigned");
        Ok(out)
    }

    /// Move the student to `mentor_id`, detaching it from the previous
    /// mentor. A previous mentor that no longer exists is an integrity error.
    #[instrument(skip(self))]
    pub async fn reassign(
        &self,
        student_id: Uuid,
        mentor_id: Uuid,
    ) -> Result<Assignment, AssignmentError> {
        let out = self
            .repo
            .transfer(student_id, mentor_id, DanglingPolicy::Fail)
            .await?;
        info!(%student_id, %mentor_id, "student reassigned");
        Ok(out)
    }
}
