//! Customer Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Customer entity (顾客), owned by one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Loyalty balance; not constrained to be non-negative at rest
    pub points: i64,
    /// Visits in the current reward cycle
    pub visit_count: i64,
    pub last_purchase: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Register customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub tenant_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}
