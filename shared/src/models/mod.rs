//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod booking;
pub mod customer;
pub mod notification;
pub mod reward;
pub mod service;
pub mod staff;
pub mod tenant;
pub mod user;
pub mod visit;

// Re-exports
pub use booking::*;
pub use customer::*;
pub use notification::*;
pub use reward::*;
pub use service::*;
pub use staff::*;
pub use tenant::*;
pub use user::*;
pub use visit::*;
