//! Admin User Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum UserRole {
    /// Administrator of a single business
    TenantAdmin,
    /// Platform operator (reviews business applications)
    PlatformAdmin,
}

/// Admin user entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    /// None for platform admins
    pub tenant_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub created_at: i64,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub tenant_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub role: UserRole,
}
