use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::storage::{Entity, StoreError};

pub const NO_MENTOR_MESSAGE: &str = "This student does not have a mentor assigned";

/// Every failure a handler can surface, mapped to one HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}: {detail}")]
    Validation { message: String, detail: String },
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{}", NO_MENTOR_MESSAGE)]
    NoMentorAssigned,
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>, detail: impl ToString) -> Self {
        ApiError::Validation {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>, detail: impl ToString) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    /// Wraps a store failure with the message of the operation that hit it.
    /// Duplicate emails stay client errors; everything else is a 500.
    pub fn from_store(message: &str, err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail { .. } => ApiError::validation(message, err),
            StoreError::Missing { entity, .. } => ApiError::NotFound(entity),
            StoreError::Database(_) => ApiError::internal(message, err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::NoMentorAssigned => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            ApiError::Validation { message, detail } | ApiError::Internal { message, detail } => {
                ErrorBody {
                    message,
                    error: Some(detail),
                }
            }
            ApiError::NotFound(entity) => ErrorBody {
                message: format!("{entity} not found"),
                error: None,
            },
            ApiError::NoMentorAssigned => ErrorBody {
                message: NO_MENTOR_MESSAGE.into(),
                error: None,
            },
        }
    }
}

/// An identifier that is not a UUID cannot name any record.
pub fn parse_id(raw: &str, entity: Entity) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound(entity))
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation("Invalid request body", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else if matches!(self, ApiError::Validation { .. }) {
            warn!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
