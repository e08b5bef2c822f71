//! Reward Repository

use super::RepoResult;
use shared::models::{CustomerReward, Reward, RewardCreate, RewardStatus};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const REWARD_SELECT: &str = "SELECT id, tenant_id, name, description, reward_type, value, points_required, visits_required, status, times_redeemed, created_at FROM reward";

const CUSTOMER_REWARD_SELECT: &str = "SELECT id, tenant_id, customer_id, reward_id, status, date_claimed, date_redeemed FROM customer_reward";

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<Reward>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{REWARD_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Reward>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn find_by_tenant(pool: &SqlitePool, tenant_id: i64) -> RepoResult<Vec<Reward>> {
    let sql = format!("{REWARD_SELECT} WHERE tenant_id = ? ORDER BY points_required");
    let rows = sqlx::query_as::<_, Reward>(&sql)
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &RewardCreate) -> RepoResult<Reward> {
    let reward = Reward {
        id: shared::util::snowflake_id(),
        tenant_id: data.tenant_id,
        name: data.name.trim().to_string(),
        description: data.description.clone(),
        reward_type: data.reward_type,
        value: data.value.clone(),
        points_required: data.points_required,
        visits_required: data.visits_required,
        status: RewardStatus::Active,
        times_redeemed: 0,
        created_at: shared::util::now_millis(),
    };
    sqlx::query(
        "INSERT INTO reward (id, tenant_id, name, description, reward_type, value, points_required, visits_required, status, times_redeemed, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10)",
    )
    .bind(reward.id)
    .bind(reward.tenant_id)
    .bind(&reward.name)
    .bind(&reward.description)
    .bind(reward.reward_type)
    .bind(&reward.value)
    .bind(reward.points_required)
    .bind(reward.visits_required)
    .bind(reward.status)
    .bind(reward.created_at)
    .execute(pool)
    .await?;
    Ok(reward)
}

pub async fn increment_redeemed(conn: &mut SqliteConnection, reward_id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE reward SET times_redeemed = times_redeemed + 1 WHERE id = ?")
        .bind(reward_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_customer_reward(
    conn: &mut SqliteConnection,
    record: &CustomerReward,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO customer_reward (id, tenant_id, customer_id, reward_id, status, date_claimed, date_redeemed) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(record.id)
    .bind(record.tenant_id)
    .bind(record.customer_id)
    .bind(record.reward_id)
    .bind(record.status)
    .bind(record.date_claimed)
    .bind(record.date_redeemed)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_customer_rewards(
    pool: &SqlitePool,
    customer_id: i64,
) -> RepoResult<Vec<CustomerReward>> {
    let sql = format!("{CUSTOMER_REWARD_SELECT} WHERE customer_id = ? ORDER BY date_claimed DESC");
    let rows = sqlx::query_as::<_, CustomerReward>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
