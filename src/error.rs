use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HubError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(String),

    #[error("SEED_ADMIN_PASSWORD is not set")]
    MissingSeedPassword,

    #[error("refusing to seed an admin in production without --force")]
    SeedRefused,

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("database connection failed: {0}")]
    Connect(#[source] SqlxError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("bcrypt cost {0} outside the supported range")]
    InvalidHashCost(u32),

    #[error("blocking task failed: {0}")]
    BlockingTask(#[from] tokio::task::JoinError),
}

impl HubError {
    /// Whether the message is safe to hand to an external client verbatim.
    /// Everything else is logged server-side and replaced with a generic
    /// message.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            HubError::Validation(_)
                | HubError::Conflict(_)
                | HubError::NotFound(_)
                | HubError::InvalidCredentials
        )
    }

    /// Client-safe message for this error.
    pub fn public_message(&self) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }
}

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

impl IntoResponse for HubError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            HubError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            HubError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            HubError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            HubError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            HubError::Connect(_) => (StatusCode::SERVICE_UNAVAILABLE, "DATABASE_UNAVAILABLE"),
            HubError::MissingDatabaseUrl
            | HubError::InvalidDatabaseUrl(_)
            | HubError::MissingSeedPassword
            | HubError::SeedRefused
            | HubError::Config(_)
            | HubError::Database(_)
            | HubError::Hash(_)
            | HubError::InvalidHashCost(_)
            | HubError::BlockingTask(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        let body = ApiErrorBody {
            code: code.to_string(),
            message: self.public_message(),
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
