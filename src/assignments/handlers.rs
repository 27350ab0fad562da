use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AssignMentorRequest, AssignmentResponse},
    repo_types::AssignmentError,
    services::AssignmentService,
};
use crate::{error::ApiError, state::AppState};

pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assign-mentor", post(assign_mentor))
        .route("/api/assign-change-mentor", post(change_mentor))
}

fn to_api_error(message: &str, err: AssignmentError) -> ApiError {
    match err {
        AssignmentError::NotFound(entity) => ApiError::NotFound(entity),
        AssignmentError::DanglingMentor { .. } => ApiError::internal(message, err),
        AssignmentError::Store(e) => ApiError::from_store(message, e),
    }
}

#[instrument(skip(service, payload))]
pub async fn assign_mentor(
    State(service): State<AssignmentService>,
    payload: Result<Json<AssignMentorRequest>, JsonRejection>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    const FAILED: &str = "Error assigning student to mentor";

    let Json(body) = payload?;
    let (student_id, mentor_id) = body.ids(FAILED)?;
    let out = service
        .assign(student_id, mentor_id)
        .await
        .map_err(|e| to_api_error(FAILED, e))?;

    Ok(Json(AssignmentResponse {
        message: "Student assigned to mentor successfully",
        student: out.student,
        mentor: out.mentor,
    }))
}

#[instrument(skip(service, payload))]
pub async fn change_mentor(
    State(service): State<AssignmentService>,
    payload: Result<Json<AssignMentorRequest>, JsonRejection>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    const FAILED: &str = "Error assigning or changing mentor";

    let Json(body) = payload?;
    let (student_id, mentor_id) = body.ids(FAILED)?;
    let out = service
        .reassign(student_id, mentor_id)
        .await
        .map_err(|e| to_api_error(FAILED, e))?;

    Ok(Json(AssignmentResponse {
        message: "Mentor assigned/changed successfully",
        student: out.student,
        mentor: out.mentor,
    }))
}
