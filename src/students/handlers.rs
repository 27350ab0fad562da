use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{dto::CreateStudentRequest, repo::StudentRepository, repo_types::Student};
use crate::{
    error::{parse_id, ApiError},
    mentors::repo_types::Mentor,
    state::AppState,
    storage::Entity,
};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/api/students", get(list_students).post(create_student))
        .route("/api/students/:id", get(get_student))
        .route("/api/students_without_mentor", get(list_students_without_mentor))
        .route("/api/student/:student_id/mentor", get(get_student_mentor))
}

#[instrument(skip(state, payload))]
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Student>), ApiError> {
    const FAILED: &str = "Error creating student";

    let Json(body) = payload.map_err(|e| ApiError::validation(FAILED, e.body_text()))?;
    let new = body.validate().map_err(|e| ApiError::validation(FAILED, e))?;
    let student = state
        .students
        .create(new)
        .await
        .map_err(|e| ApiError::from_store(FAILED, e))?;

    info!(student_id = %student.id, email = %student.email, "student created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/students/{}", student.id))],
        Json(student),
    ))
}

#[instrument(skip(state))]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state
        .students
        .list_all()
        .await
        .map_err(|e| ApiError::from_store("Error retrieving students", e))?;
    Ok(Json(students))
}

#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id, Entity::Student)?;
    let student = state
        .students
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_store("Error retrieving student", e))?;
    student.map(Json).ok_or(ApiError::NotFound(Entity::Student))
}

#[instrument(skip(state))]
pub async fn list_students_without_mentor(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state
        .students
        .list_without_mentor()
        .await
        .map_err(|e| ApiError::from_store("Error retrieving students", e))?;
    Ok(Json(students))
}

/// 404 with a distinct message when the student exists but has no mentor.
#[instrument(skip(state))]
pub async fn get_student_mentor(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Mentor>, ApiError> {
    let student_id = parse_id(&student_id, Entity::Student)?;
    let mentor = state
        .students
        .get_mentor_of(student_id)
        .await
        .map_err(|e| ApiError::from_store("Error retrieving mentor for student", e))?;
    mentor.map(Json).ok_or(ApiError::NoMentorAssigned)
}
