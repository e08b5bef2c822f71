//! `AppError` and the JSON error body returned by the API

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error: a stable [`ErrorCode`], a human message and optional
/// structured details (offending field, expected / current version, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Result type for service and handler code
pub type AppResult<T> = Result<T, AppError>;

/// Error body: `{"code": 4003, "message": "...", "details": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // 系统错误记录日志，业务错误只返回给调用方
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        (self.http_status(), axum::Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_the_default_message() {
        let err = AppError::new(ErrorCode::InsufficientPoints);
        assert_eq!(err.message, ErrorCode::InsufficientPoints.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn details_accumulate() {
        let err = AppError::validation("Name is required")
            .with_detail("field", "name")
            .with_detail("max_len", 80);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["field"], "name");
        assert_eq!(details["max_len"], 80);
    }

    #[test]
    fn body_carries_numeric_code_and_details() {
        let err = AppError::new(ErrorCode::BookingVersionConflict).with_detail("booking_id", 7);
        let body = ErrorBody::from(&err);
        assert_eq!(body.code, ErrorCode::BookingVersionConflict.code());
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["details"]["booking_id"], 7);
    }

    #[test]
    fn body_omits_empty_details() {
        let body = ErrorBody::from(&AppError::database("disk full"));
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
