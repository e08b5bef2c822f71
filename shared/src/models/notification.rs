//! Notification Models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RecipientType {
    Customer,
    /// An admin [`User`](super::User)
    Admin,
    Staff,
}

/// Kind of notification. Stored on every notification row and used to
/// decide which tenant email toggle applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum NotificationEvent {
    // Customer-facing booking lifecycle
    BookingReceived,
    BookingApproved,
    BookingCancelled,
    BookingRejected,
    BookingNoShow,
    BookingRescheduled,
    BookingReminder,
    VisitThankYou,
    CustomerWelcome,

    // Tenant admin
    TenantNewBooking,
    TenantBookingCancelled,
    TenantBookingRescheduled,
    TenantNewCustomer,
    StaffAdded,

    // Staff
    StaffNewAppointment,
    StaffAppointmentCancelled,
    StaffAppointmentRescheduled,
    StaffAssigned,
    StaffUnassigned,

    // Business lifecycle
    BusinessApplication,
    BusinessApproved,
    BusinessRejected,
    BusinessSuspended,
}

/// Notification entity (站内通知)
///
/// Exactly one of `customer_id` / `user_id` / `staff_member_id` is set,
/// matching `recipient_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub tenant_id: Option<i64>,
    pub recipient_type: RecipientType,
    pub customer_id: Option<i64>,
    pub user_id: Option<i64>,
    pub staff_member_id: Option<i64>,
    pub event: NotificationEvent,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: i64,
}

/// List query for one recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationQuery {
    pub recipient_type: RecipientType,
    pub recipient_id: i64,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OutboxStatus {
    Pending,
    Sent,
    /// Gave up after the maximum number of attempts
    Dead,
}

/// Queued outgoing email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OutboxEmail {
    pub id: i64,
    pub notification_id: Option<i64>,
    pub tenant_id: Option<i64>,
    pub from_address: String,
    pub to_address: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
    pub status: OutboxStatus,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub next_attempt_at: i64,
    pub created_at: i64,
    pub sent_at: Option<i64>,
}
