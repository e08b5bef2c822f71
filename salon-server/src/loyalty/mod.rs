//! Loyalty: visit accrual and reward redemption

pub mod redemption;
pub mod visits;

pub use redemption::{RedemptionCost, plan_redemption, redeem};
pub use visits::{VisitLedger, points_for};
