//! Reward redemption
//!
//! Visit-cycle rewards (`visits_required > 0`) restart the customer's visit
//! count; other rewards cost `points_required`. A customer who does not
//! qualify is rejected and nothing changes.

use crate::db::{begin_write, db_error};
use crate::db::repository::{customer, reward};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Customer, CustomerReward, CustomerRewardStatus, Reward, RewardStatus};
use sqlx::SqlitePool;

/// Balance change a redemption applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionCost {
    /// Reset `visit_count` to 0; requires at least this many visits
    VisitCycle(i64),
    /// Deduct this many points
    Points(i64),
    Free,
}

/// Decide what redeeming `reward` costs `customer`, rejecting it if the
/// customer does not qualify.
pub fn plan_redemption(customer: &Customer, reward: &Reward) -> AppResult<RedemptionCost> {
    if reward.status != RewardStatus::Active {
        return Err(AppError::new(ErrorCode::RewardNotActive));
    }
    if reward.tenant_id != customer.tenant_id {
        return Err(AppError::new(ErrorCode::TenantMismatch).with_detail("field", "reward_id"));
    }

    if let Some(required) = reward.visit_threshold() {
        if customer.visit_count < required {
            return Err(insufficient_visits(customer.visit_count, required));
        }
        return Ok(RedemptionCost::VisitCycle(required));
    }
    if reward.points_required > 0 {
        if customer.points < reward.points_required {
            return Err(insufficient_points(customer.points, reward.points_required));
        }
        return Ok(RedemptionCost::Points(reward.points_required));
    }
    Ok(RedemptionCost::Free)
}

fn insufficient_visits(have: i64, need: i64) -> AppError {
    AppError::with_message(
        ErrorCode::InsufficientVisits,
        format!("Reward requires {need} visits, customer has {have}"),
    )
    .with_detail("required", need)
    .with_detail("available", have)
}

fn insufficient_points(have: i64, need: i64) -> AppError {
    AppError::with_message(
        ErrorCode::InsufficientPoints,
        format!("Reward requires {need} points, customer has {have}"),
    )
    .with_detail("required", need)
    .with_detail("available", have)
}

/// Redeem `reward_id` for `customer_id`
///
/// The balance check is repeated by the conditional update, so a concurrent
/// redemption cannot overdraw the customer.
pub async fn redeem(pool: &SqlitePool, customer_id: i64, reward_id: i64) -> AppResult<CustomerReward> {
    let mut tx = begin_write(pool).await?;

    let owner = customer::find_by_id(&mut *tx, customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    let target = reward::find_by_id(&mut *tx, reward_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RewardNotFound))?;

    match plan_redemption(&owner, &target)? {
        RedemptionCost::VisitCycle(required) => {
            if !customer::reset_visit_cycle(&mut *tx, owner.id, required).await? {
                return Err(insufficient_visits(owner.visit_count, required));
            }
        }
        RedemptionCost::Points(amount) => {
            if !customer::deduct_points(&mut *tx, owner.id, amount).await? {
                return Err(insufficient_points(owner.points, amount));
            }
        }
        RedemptionCost::Free => {}
    }

    reward::increment_redeemed(&mut *tx, target.id).await?;

    let now = shared::util::now_millis();
    let record = CustomerReward {
        id: shared::util::snowflake_id(),
        tenant_id: owner.tenant_id,
        customer_id: owner.id,
        reward_id: target.id,
        status: CustomerRewardStatus::Redeemed,
        date_claimed: now,
        date_redeemed: Some(now),
    };
    reward::insert_customer_reward(&mut *tx, &record).await?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        customer_id = owner.id,
        reward_id = target.id,
        "Reward redeemed"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::RewardType;

    fn customer(points: i64, visits: i64) -> Customer {
        Customer {
            id: 1,
            tenant_id: 1,
            name: "Ann".into(),
            email: None,
            phone: None,
            points,
            visit_count: visits,
            last_purchase: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn reward(points: i64, visits: Option<i64>) -> Reward {
        Reward {
            id: 5,
            tenant_id: 1,
            name: "Free Trim".into(),
            description: None,
            reward_type: RewardType::FreeService,
            value: "Trim".into(),
            points_required: points,
            visits_required: visits,
            status: RewardStatus::Active,
            times_redeemed: 0,
            created_at: 0,
        }
    }

    #[test]
    fn visit_rewards_take_precedence_over_points() {
        let plan = plan_redemption(&customer(0, 5), &reward(1000, Some(5))).unwrap();
        assert_eq!(plan, RedemptionCost::VisitCycle(5));
    }

    #[test]
    fn zero_visit_threshold_means_points_reward() {
        let plan = plan_redemption(&customer(300, 0), &reward(200, Some(0))).unwrap();
        assert_eq!(plan, RedemptionCost::Points(200));
    }

    #[test]
    fn underqualified_customers_are_rejected() {
        let err = plan_redemption(&customer(0, 4), &reward(0, Some(5))).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientVisits);

        let err = plan_redemption(&customer(199, 0), &reward(200, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientPoints);
    }

    #[test]
    fn inactive_or_foreign_rewards_are_rejected() {
        let mut inactive = reward(10, None);
        inactive.status = RewardStatus::Inactive;
        assert_eq!(
            plan_redemption(&customer(100, 0), &inactive).unwrap_err().code,
            ErrorCode::RewardNotActive
        );

        let mut foreign = reward(10, None);
        foreign.tenant_id = 2;
        assert_eq!(
            plan_redemption(&customer(100, 0), &foreign).unwrap_err().code,
            ErrorCode::TenantMismatch
        );
    }

    #[test]
    fn rewards_without_cost_are_free() {
        assert_eq!(
            plan_redemption(&customer(0, 0), &reward(0, None)).unwrap(),
            RedemptionCost::Free
        );
    }
}
