use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::{booking::BookingError, db::DbError};

#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before anything was written.
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    /// Staff login with a phone that matches neither the owner nor any personnel.
    #[error("This phone number is not registered. Only the salon owner or staff can sign in.")]
    NotRegistered,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Cannot change a {from} appointment to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotRegistered | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Database(DbError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(DbError::NotFound { .. }) => self.to_string(),
            AppError::Database(err) => {
                log::error!("Database error: {err}");
                "Operation failed".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_guards_are_bad_requests() {
        let err = AppError::from(BookingError::NoServices);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Please select at least one service.");
    }

    #[test]
    fn missing_rows_are_not_found() {
        let err = AppError::from(DbError::NotFound {
            entity: "Appointment",
            id: "a1".into(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidTransition {
                from: "cancelled".into(),
                to: "confirmed".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }
}
