//! Visit Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentStatus {
    Pending,
    #[default]
    Paid,
    Partial,
}

/// A completed service encounter (到店记录); drives loyalty accrual
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Visit {
    pub id: i64,
    pub tenant_id: i64,
    pub customer_id: i64,
    pub staff_member_id: Option<i64>,
    /// Set when the visit was materialized from a completed booking
    pub booking_id: Option<i64>,
    pub visit_date: i64,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub notes: String,
    pub created_at: i64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub service_ids: Vec<i64>,
}

/// Record visit payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitCreate {
    pub customer_id: i64,
    pub staff_member_id: Option<i64>,
    #[serde(default)]
    pub service_ids: Vec<i64>,
    pub total_amount: f64,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Defaults to now
    pub visit_date: Option<i64>,
    pub notes: Option<String>,
}
