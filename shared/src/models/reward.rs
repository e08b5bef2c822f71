//! Reward Models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RewardType {
    #[default]
    Discount,
    FreeService,
    Product,
    Cashback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RewardStatus {
    #[default]
    Active,
    Inactive,
}

/// Reward definition
///
/// A reward with `visits_required > 0` is a visit-cycle reward; otherwise it
/// is paid for with `points_required`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reward {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub reward_type: RewardType,
    /// Free-form value, e.g. "10%" or "Free Haircut"
    pub value: String,
    pub points_required: i64,
    pub visits_required: Option<i64>,
    pub status: RewardStatus,
    pub times_redeemed: i64,
    pub created_at: i64,
}

impl Reward {
    /// Visit threshold, when this is a visit-cycle reward
    pub fn visit_threshold(&self) -> Option<i64> {
        self.visits_required.filter(|v| *v > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardCreate {
    pub tenant_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub reward_type: RewardType,
    pub value: String,
    #[serde(default)]
    pub points_required: i64,
    pub visits_required: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum CustomerRewardStatus {
    #[default]
    Pending,
    Redeemed,
    Expired,
}

/// A reward claimed by a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerReward {
    pub id: i64,
    pub tenant_id: i64,
    pub customer_id: i64,
    pub reward_id: i64,
    pub status: CustomerRewardStatus,
    pub date_claimed: i64,
    pub date_redeemed: Option<i64>,
}

/// Redeem payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub reward_id: i64,
}
