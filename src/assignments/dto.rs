use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{parse_id, ApiError},
    mentors::repo_types::Mentor,
    storage::Entity,
    students::repo_types::Student,
    validation::FieldCheck,
};

/// Body of `POST /api/assign-mentor` and `POST /api/assign-change-mentor`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMentorRequest {
    pub student_id: Option<String>,
    pub mentor_id: Option<String>,
}

impl AssignMentorRequest {
    /// Missing ids are a validation error; ids that cannot name a record
    /// are reported as not found, student first.
    pub fn ids(self, message: &str) -> Result<(Uuid, Uuid), ApiError> {
        let mut check = FieldCheck::default();
        let student = check.text("studentId", self.student_id);
        let mentor = check.text("mentorId", self.mentor_id);
        check.finish().map_err(|e| ApiError::validation(message, e))?;

        Ok((
            parse_id(&student, Entity::Student)?,
            parse_id(&mentor, Entity::Mentor)?,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub message: &'static str,
    pub student: Student,
    pub mentor: Mentor,
}
