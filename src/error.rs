//! Error types for Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes exposed in error response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchBook = 5,
    NoSuchLoan = 6,
    BookNotAvailable = 7,
    Duplicate = 8,
    LoanNotActive = 9,
    BadValue = 10,
}

/// Entity kind carried by `NotFound` so the response body gets the
/// matching error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Book,
    Loan,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {1}")]
    NotFound(Resource, String),

    /// No copy of the requested book is currently in stock
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Operation is not valid for the loan's current status (e.g. double return)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_not_found(id: i32) -> Self {
        AppError::NotFound(Resource::User, format!("User with id {} not found", id))
    }

    pub fn book_not_found(id: i32) -> Self {
        AppError::NotFound(Resource::Book, format!("Book with id {} not found", id))
    }

    pub fn loan_not_found(id: i32) -> Self {
        AppError::NotFound(Resource::Loan, format!("Loan with id {} not found", id))
    }

    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::NotFound(resource, _) => {
                let code = match resource {
                    Resource::User => ErrorCode::NoSuchUser,
                    Resource::Book => ErrorCode::NoSuchBook,
                    Resource::Loan => ErrorCode::NoSuchLoan,
                };
                (StatusCode::NOT_FOUND, code)
            }
            AppError::Unavailable(_) => (StatusCode::CONFLICT, ErrorCode::BookNotAvailable),
            AppError::InvalidState(_) => (StatusCode::CONFLICT, ErrorCode::LoanNotActive),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never leak database or internal details to the client
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::NotFound(_, msg) => msg.clone(),
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::Unavailable(msg)
            | AppError::InvalidState(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_maps_to_conflict() {
        let response = AppError::Unavailable("no copies left".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_state_maps_to_conflict() {
        let response = AppError::InvalidState("loan already returned".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::book_not_found(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_found_code_follows_entity() {
        let (_, code) = AppError::user_not_found(1).status_and_code();
        assert_eq!(code, ErrorCode::NoSuchUser);

        let (_, code) = AppError::book_not_found(1).status_and_code();
        assert_eq!(code, ErrorCode::NoSuchBook);

        let (_, code) = AppError::loan_not_found(1).status_and_code();
        assert_eq!(code, ErrorCode::NoSuchLoan);
    }
}
