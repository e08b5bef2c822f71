//! Unified error codes for the salon platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 3xxx: Tenant errors
//! - 4xxx: Booking errors
//! - 5xxx: Loyalty errors (visits, points, rewards)
//! - 6xxx: Directory errors (customers, staff, services, users)
//! - 7xxx: Notification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 3xxx: Tenant ====================
    /// Tenant not found
    TenantNotFound = 3001,
    /// Referenced records belong to different tenants
    TenantMismatch = 3003,

    // ==================== 4xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 4001,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4002,
    /// Booking was modified concurrently
    BookingVersionConflict = 4003,

    // ==================== 5xxx: Loyalty ====================
    /// Customer does not have enough points
    InsufficientPoints = 5001,
    /// Customer does not have enough visits
    InsufficientVisits = 5002,
    /// Reward not found
    RewardNotFound = 5003,
    /// Reward is not active
    RewardNotActive = 5004,
    /// Visit not found
    VisitNotFound = 5005,
    /// Visit amount is negative or not a number
    InvalidVisitAmount = 5006,

    // ==================== 6xxx: Directory ====================
    /// Customer not found
    CustomerNotFound = 6001,
    /// Staff member not found
    StaffNotFound = 6002,
    /// Service not found
    ServiceNotFound = 6003,
    /// User not found
    UserNotFound = 6004,

    // ==================== 7xxx: Notification ====================
    /// Notification not found
    NotificationNotFound = 7001,
    /// Outbox email not found
    OutboxEmailNotFound = 7002,
    /// Outbox email is not in the dead-letter state
    OutboxEmailNotDead = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Tenant
            ErrorCode::TenantNotFound => "Tenant not found",
            ErrorCode::TenantMismatch => "Records belong to different tenants",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::InvalidStatusTransition => "Booking status change is not allowed",
            ErrorCode::BookingVersionConflict => "Booking was modified by another request",

            // Loyalty
            ErrorCode::InsufficientPoints => "Insufficient points",
            ErrorCode::InsufficientVisits => "Insufficient visits",
            ErrorCode::RewardNotFound => "Reward not found",
            ErrorCode::RewardNotActive => "Reward is not active",
            ErrorCode::VisitNotFound => "Visit not found",
            ErrorCode::InvalidVisitAmount => "Visit amount must be a non-negative number",

            // Directory
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::UserNotFound => "User not found",

            // Notification
            ErrorCode::NotificationNotFound => "Notification not found",
            ErrorCode::OutboxEmailNotFound => "Outbox email not found",
            ErrorCode::OutboxEmailNotDead => "Outbox email is not dead-lettered",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Tenant
            3001 => Ok(ErrorCode::TenantNotFound),
            3003 => Ok(ErrorCode::TenantMismatch),

            // Booking
            4001 => Ok(ErrorCode::BookingNotFound),
            4002 => Ok(ErrorCode::InvalidStatusTransition),
            4003 => Ok(ErrorCode::BookingVersionConflict),

            // Loyalty
            5001 => Ok(ErrorCode::InsufficientPoints),
            5002 => Ok(ErrorCode::InsufficientVisits),
            5003 => Ok(ErrorCode::RewardNotFound),
            5004 => Ok(ErrorCode::RewardNotActive),
            5005 => Ok(ErrorCode::VisitNotFound),
            5006 => Ok(ErrorCode::InvalidVisitAmount),

            // Directory
            6001 => Ok(ErrorCode::CustomerNotFound),
            6002 => Ok(ErrorCode::StaffNotFound),
            6003 => Ok(ErrorCode::ServiceNotFound),
            6004 => Ok(ErrorCode::UserNotFound),

            // Notification
            7001 => Ok(ErrorCode::NotificationNotFound),
            7002 => Ok(ErrorCode::OutboxEmailNotFound),
            7003 => Ok(ErrorCode::OutboxEmailNotDead),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::TenantNotFound.code(), 3001);
        assert_eq!(ErrorCode::BookingVersionConflict.code(), 4003);
        assert_eq!(ErrorCode::InsufficientPoints.code(), 5001);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 6001);
        assert_eq!(ErrorCode::OutboxEmailNotDead.code(), 7003);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_roundtrips_every_known_code() {
        for value in 0..10_000u16 {
            if let Ok(code) = ErrorCode::try_from(value) {
                assert_eq!(code.code(), value);
            }
        }
        assert_eq!(ErrorCode::try_from(6), Err(InvalidErrorCode(6)));
        assert_eq!(ErrorCode::try_from(1001), Err(InvalidErrorCode(1001)));
    }

    #[test]
    fn test_serde_uses_numeric_code() {
        let json = serde_json::to_string(&ErrorCode::InsufficientVisits).unwrap();
        assert_eq!(json, "5002");

        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::InvalidStatusTransition);

        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display_is_numeric() {
        assert_eq!(ErrorCode::TenantMismatch.to_string(), "3003");
    }
}
