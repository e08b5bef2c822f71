//! Service (menu item) Model

use serde::{Deserialize, Serialize};

/// A bookable service offered by a tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Service {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: i64,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub tenant_id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
}

fn default_duration() -> i64 {
    30
}
