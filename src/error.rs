use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] axum::extract::rejection::JsonRejection),

    #[error("Invalid multipart body: {0}")]
    InvalidMultipart(#[from] axum::extract::multipart::MultipartRejection),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_)
            | Error::Validation(_)
            | Error::InvalidBody(_)
            | Error::InvalidMultipart(_)
            | Error::Conflict(_)
            | Error::InvalidCredentials
            | Error::Csv(_)
            | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::MissingToken => StatusCode::UNAUTHORIZED,
            Error::InvalidToken | Error::TokenExpired => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_)
            | Error::Database(_)
            | Error::Migrate(_)
            | Error::Json(_)
            | Error::Io(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            Error::BadRequest(msg) | Error::Conflict(msg) | Error::NotFound(msg) => msg,
            Error::Validation(err) => err.to_string(),
            Error::InvalidBody(rejection) => rejection.body_text(),
            Error::InvalidMultipart(rejection) => rejection.body_text(),
            Error::Csv(err) => {
                tracing::warn!(error = %err, "CSV parse error");
                "Error parsing CSV file".to_string()
            }
            Error::Multipart(err) => err.to_string(),
            Error::InvalidCredentials => "Invalid credentials".to_string(),
            Error::MissingToken => "Access token required".to_string(),
            Error::InvalidToken => "Invalid token".to_string(),
            Error::TokenExpired => "Token expired".to_string(),
            other => {
                tracing::error!(error = %other, "request failed");
                "An unexpected error occurred".to_string()
            }
        };

        let body = Json(json!({ "message": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Error::Internal(format!("password hashing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("background task failed: {}", err))
    }
}
