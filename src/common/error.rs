// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// Internal error taxonomy. Services and repositories return this;
// handlers turn it into an `ApiError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Missing Fields")]
    MissingFields(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("E-mail already in use")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("You are not a member of this company")]
    TenantAccessDenied,

    #[error("Permission '{0}' required")]
    PermissionDenied(&'static str),

    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Cannot move job from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Document rendering failed: {0}")]
    DocumentRender(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// HTTP-facing error: `{"error": ..., "details": ...}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl AppError {
    pub fn to_api_error(self) -> ApiError {
        match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: "One or more fields are invalid.".into(),
                    details: Some(json!(details)),
                }
            }
            AppError::MissingFields(description) => ApiError {
                status: StatusCode::BAD_REQUEST,
                error: "Missing Fields".into(),
                details: Some(json!({ "description": description })),
            },
            AppError::InvalidInput(msg) => ApiError::new(StatusCode::BAD_REQUEST, msg),
            AppError::EmailAlreadyExists => {
                ApiError::new(StatusCode::CONFLICT, "This e-mail is already in use.")
            }
            AppError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, "Invalid e-mail or password.")
            }
            AppError::InvalidToken => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "Authentication token is invalid or missing.",
            ),
            AppError::UserNotFound => ApiError::new(StatusCode::NOT_FOUND, "User not found."),
            AppError::TenantAccessDenied => ApiError::new(
                StatusCode::FORBIDDEN,
                "You do not have access to this company.",
            ),
            AppError::PermissionDenied(slug) => ApiError::new(
                StatusCode::FORBIDDEN,
                format!("The '{}' permission is required for this action.", slug),
            ),
            AppError::ResourceNotFound(what) => {
                ApiError::new(StatusCode::NOT_FOUND, format!("{} not found.", what))
            }
            AppError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            AppError::InvalidStatusTransition { from, to } => ApiError {
                status: StatusCode::CONFLICT,
                error: format!("A job cannot move from {} to {}.", from, to),
                details: Some(json!({ "from": from, "to": to })),
            },
            AppError::UniqueConstraintViolation(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            // Everything else is a 500; the detailed message only goes to the log.
            e => {
                tracing::error!("Internal server error: {:?}", e);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.")
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error().into_response()
    }
}

/// Maps unique-key violations to a conflict with a readable message.
pub fn map_unique_violation(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(message());
        }
    }
    AppError::DatabaseError(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Named {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    #[test]
    fn validation_errors_are_listed_per_field() {
        let err = Named { name: String::new() }.validate().unwrap_err();
        let api = AppError::ValidationError(err).to_api_error();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "required");
    }

    #[test]
    fn missing_fields_keeps_its_title() {
        let api = AppError::MissingFields("Please provide name and at least one step".into())
            .to_api_error();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Missing Fields");
        assert_eq!(
            api.details.unwrap()["description"],
            "Please provide name and at least one step"
        );
    }

    #[test]
    fn invalid_transition_is_a_conflict() {
        let api = AppError::InvalidStatusTransition {
            from: "COMPLETED".into(),
            to: "SCHEDULED".into(),
        }
        .to_api_error();

        assert_eq!(api.status, StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let api = AppError::InternalServerError(anyhow::anyhow!("pool exhausted")).to_api_error();

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("pool"));
    }
}
