//! Booking Model

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking status
///
/// Nominal graph:
/// ```text
/// pending ──► confirmed ──► completed
///    │            ├───────► cancelled
///    │            └───────► no_show
///    ├──► cancelled
///    └──► rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
    Completed,
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
        }
    }

    /// Whether `next` is an edge of the nominal status graph
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Pending, Rejected)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit status command (one edge of the status graph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingCommand {
    Confirm,
    Cancel,
    Reject,
    Complete,
    NoShow,
}

impl BookingCommand {
    pub fn target(&self) -> BookingStatus {
        match self {
            Self::Confirm => BookingStatus::Confirmed,
            Self::Cancel => BookingStatus::Cancelled,
            Self::Reject => BookingStatus::Rejected,
            Self::Complete => BookingStatus::Completed,
            Self::NoShow => BookingStatus::NoShow,
        }
    }
}

impl FromStr for BookingCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirm" => Ok(Self::Confirm),
            "cancel" => Ok(Self::Cancel),
            "reject" => Ok(Self::Reject),
            "complete" => Ok(Self::Complete),
            "no-show" | "no_show" => Ok(Self::NoShow),
            other => Err(format!("unknown booking action: {other}")),
        }
    }
}

/// Booking entity (预约)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub tenant_id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub staff_member_id: Option<i64>,
    /// Appointment start (Unix millis)
    pub booking_date: i64,
    pub status: BookingStatus,
    pub notes: String,
    pub reminder_sent: bool,
    pub reminder_24h_sent: bool,
    /// Optimistic concurrency counter, bumped on every write
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Booking {
    /// The booking as it would look after `patch` is applied
    pub fn with_update(&self, patch: &BookingUpdate) -> Booking {
        let mut next = self.clone();
        if let Some(service_id) = patch.service_id {
            next.service_id = service_id;
        }
        if let Some(staff) = patch.staff_member_id {
            next.staff_member_id = staff;
        }
        if let Some(date) = patch.booking_date {
            next.booking_date = date;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(notes) = &patch.notes {
            next.notes = notes.clone();
        }
        next
    }
}

/// Create booking payload (tenant is taken from the customer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub customer_id: i64,
    pub service_id: i64,
    pub staff_member_id: Option<i64>,
    pub booking_date: i64,
    #[serde(default)]
    pub status: BookingStatus,
    pub notes: Option<String>,
}

/// Update booking payload
///
/// `staff_member_id: null` unassigns staff; an absent field leaves it as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub service_id: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub staff_member_id: Option<Option<i64>>,
    pub booking_date: Option<i64>,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
    /// Version the caller last read; a mismatch is rejected
    pub expected_version: Option<i64>,
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking {
            id: 10,
            tenant_id: 1,
            customer_id: 2,
            service_id: 3,
            staff_member_id: Some(4),
            booking_date: 1_000,
            status: BookingStatus::Pending,
            notes: String::new(),
            reminder_sent: false,
            reminder_24h_sent: false,
            version: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn nominal_graph_edges() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn command_parsing() {
        assert_eq!("no-show".parse::<BookingCommand>(), Ok(BookingCommand::NoShow));
        assert_eq!(
            "complete".parse::<BookingCommand>().map(|c| c.target()),
            Ok(BookingStatus::Completed)
        );
        assert!("archive".parse::<BookingCommand>().is_err());
    }

    #[test]
    fn update_distinguishes_null_from_absent_staff() {
        let absent: BookingUpdate = serde_json::from_str(r#"{"notes":"x"}"#).unwrap();
        assert_eq!(absent.staff_member_id, None);
        assert_eq!(booking().with_update(&absent).staff_member_id, Some(4));

        let cleared: BookingUpdate = serde_json::from_str(r#"{"staff_member_id":null}"#).unwrap();
        assert_eq!(cleared.staff_member_id, Some(None));
        assert_eq!(booking().with_update(&cleared).staff_member_id, None);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            "\"no_show\""
        );
    }
}
