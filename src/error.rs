use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::conference::ConferenceError;
use crate::models::speaker::SpeakerError;
use crate::models::talk::TalkError;
use crate::models::venue::VenueError;
use crate::utils::ValidationError;

/// Body every endpoint returns on failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Short reason phrase, e.g. "Conflict"
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

/// HTTP-facing error. Model errors convert into this at the handler
/// boundary; database failures are logged here and leave the process as an
/// opaque 500.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal() -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self
            .status
            .canonical_reason()
            .unwrap_or("Error")
            .to_string();
        (
            self.status,
            Json(ErrorBody {
                error,
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        ApiError::internal()
    }
}

impl From<SpeakerError> for ApiError {
    fn from(err: SpeakerError) -> Self {
        let status = match &err {
            SpeakerError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                return ApiError::internal();
            }
            SpeakerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SpeakerError::NotFound => StatusCode::NOT_FOUND,
            SpeakerError::HasTalks => StatusCode::CONFLICT,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<TalkError> for ApiError {
    fn from(err: TalkError) -> Self {
        let status = match &err {
            TalkError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                return ApiError::internal();
            }
            TalkError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TalkError::NotFound => StatusCode::NOT_FOUND,
            // The speaker id arrives in the request body, so a dangling
            // reference is a conflict rather than a missing route target.
            TalkError::SpeakerNotFound => StatusCode::CONFLICT,
            TalkError::InvalidTransition(_) => StatusCode::CONFLICT,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<VenueError> for ApiError {
    fn from(err: VenueError) -> Self {
        let status = match &err {
            VenueError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                return ApiError::internal();
            }
            VenueError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            VenueError::NotFound => StatusCode::NOT_FOUND,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<ConferenceError> for ApiError {
    fn from(err: ConferenceError) -> Self {
        let status = match &err {
            ConferenceError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                return ApiError::internal();
            }
            ConferenceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ConferenceError::NotFound
            | ConferenceError::SpeakerNotFound
            | ConferenceError::TalkNotFound
            | ConferenceError::SpeakerNotAttached
            | ConferenceError::TalkNotAttached => StatusCode::NOT_FOUND,
            // Dangling venue id in the payload
            ConferenceError::VenueNotFound => StatusCode::CONFLICT,
            ConferenceError::SpeakerAlreadyAttached | ConferenceError::TalkAlreadyAttached => {
                StatusCode::CONFLICT
            }
        };
        ApiError::new(status, err.to_string())
    }
}
