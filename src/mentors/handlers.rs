use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderName, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{dto::CreateMentorRequest, repo::MentorRepository, repo_types::Mentor};
use crate::{
    error::{parse_id, ApiError},
    state::AppState,
    storage::Entity,
    students::repo_types::Student,
};

pub fn mentor_routes() -> Router<AppState> {
    Router::new()
        .route("/api/mentors", post(create_mentor))
        .route("/api/mentors/:id", get(get_mentor))
        .route("/api/mentor/:mentor_id/students", get(list_mentor_students))
}

#[instrument(skip(state, payload))]
pub async fn create_mentor(
    State(state): State<AppState>,
    payload: Result<Json<CreateMentorRequest>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Mentor>), ApiError> {
    const FAILED: &str = "Error creating mentor";

    let Json(body) = payload.map_err(|e| ApiError::validation(FAILED, e.body_text()))?;
    let new = body.validate().map_err(|e| ApiError::validation(FAILED, e))?;
    let mentor = state
        .mentors
        .create(new)
        .await
        .map_err(|e| ApiError::from_store(FAILED, e))?;

    info!(mentor_id = %mentor.id, email = %mentor.email, "mentor created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/mentors/{}", mentor.id))],
        Json(mentor),
    ))
}

#[instrument(skip(state))]
pub async fn get_mentor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Mentor>, ApiError> {
    let id = parse_id(&id, Entity::Mentor)?;
    state
        .mentors
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_store("Error retrieving mentor", e))?
        .map(Json)
        .ok_or(ApiError::NotFound(Entity::Mentor))
}

#[instrument(skip(state))]
pub async fn list_mentor_students(
    State(state): State<AppState>,
    Path(mentor_id): Path<String>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let mentor_id = parse_id(&mentor_id, Entity::Mentor)?;
    let students = state
        .mentors
        .list_students_of(mentor_id)
        .await
        .map_err(|e| ApiError::from_store("Error retrieving students for mentor", e))?;
    Ok(Json(students))
}
