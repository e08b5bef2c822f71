//! Booking lifecycle engine
//!
//! ```text
//! API ──► BookingLifecycle ──(commit)──► plan_effects(before, after)
//!                                             │
//!                        ┌────────────────────┼──────────────────┐
//!                        ▼                    ▼                  ▼
//!                 VisitLedger        NotificationDispatcher   (per audience)
//! ```

pub mod lifecycle;
pub mod messages;
pub mod transition;

pub use lifecycle::BookingLifecycle;
pub use transition::{Audience, BookingEffect, plan_effects};
