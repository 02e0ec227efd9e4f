use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Failure taxonomy for the booking engine. Every variant maps to a stable
/// machine-readable kind plus a human-readable message; handlers bubble these
/// up with `?` and actix renders them through [`ResponseError`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid or missing field: {field}")]
    Validation { field: String },

    #[error("Flight not found")]
    FlightNotFound,

    #[error("Insufficient wallet balance")]
    InsufficientFunds,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Booking already cancelled")]
    AlreadyCancelled,

    #[error("Cannot cancel completed booking")]
    AlreadyCompleted,

    #[error("Cannot cancel past bookings")]
    PastFlight,

    #[error("Unknown travel class: {0}")]
    UnknownClass(String),

    #[error("Could not allocate a unique confirmation code")]
    PnrRetryExhausted,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl ApiError {
    pub fn validation(field: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
        }
    }

    /// Stable error kind surfaced to clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::AuthRequired => "auth_required",
            ApiError::Validation { .. } => "validation_error",
            ApiError::FlightNotFound => "flight_not_found",
            ApiError::InsufficientFunds => "insufficient_funds",
            ApiError::BookingNotFound => "booking_not_found",
            ApiError::AlreadyCancelled => "already_cancelled",
            ApiError::AlreadyCompleted => "already_completed",
            ApiError::PastFlight => "past_flight",
            ApiError::UnknownClass(_) => "unknown_class",
            ApiError::PnrRetryExhausted => "pnr_retry_exhausted",
            ApiError::Database(_) => "database_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthRequired => StatusCode::UNAUTHORIZED,
            ApiError::FlightNotFound | ApiError::BookingNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation { .. }
            | ApiError::InsufficientFunds
            | ApiError::AlreadyCancelled
            | ApiError::AlreadyCompleted
            | ApiError::PastFlight
            | ApiError::UnknownClass(_) => StatusCode::BAD_REQUEST,
            ApiError::PnrRetryExhausted | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::AuthRequired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::FlightNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BookingNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InsufficientFunds.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PnrRetryExhausted.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(ApiError::validation("phoneNumber").kind(), "validation_error");
        assert_eq!(ApiError::AlreadyCancelled.kind(), "already_cancelled");
        assert_eq!(
            ApiError::UnknownClass("luxury".into()).kind(),
            "unknown_class"
        );
    }
}
