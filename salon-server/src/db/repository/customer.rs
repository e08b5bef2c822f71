//! Customer Repository

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{Customer, CustomerCreate};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const CUSTOMER_SELECT: &str = "SELECT id, tenant_id, name, email, phone, points, visit_count, last_purchase, created_at, updated_at FROM customer";

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<Customer>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn find_by_tenant(pool: &SqlitePool, tenant_id: i64) -> RepoResult<Vec<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE tenant_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &CustomerCreate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let customer = Customer {
        id: shared::util::snowflake_id(),
        tenant_id: data.tenant_id,
        name: data.name.trim().to_string(),
        email: data.email.clone().filter(|e| !e.trim().is_empty()),
        phone: data.phone.clone(),
        points: 0,
        visit_count: 0,
        last_purchase: None,
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        "INSERT INTO customer (id, tenant_id, name, email, phone, points, visit_count, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?6)",
    )
    .bind(customer.id)
    .bind(customer.tenant_id)
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.phone)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(customer)
}

/// Atomically accrue one visit: `visit_count + 1`, `points + earned`,
/// `last_purchase = visit_date`
pub async fn accrue_visit(
    conn: &mut SqliteConnection,
    customer_id: i64,
    points_earned: i64,
    visit_date: NaiveDate,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET visit_count = visit_count + 1, points = points + ?1, last_purchase = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(points_earned)
    .bind(visit_date)
    .bind(now)
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Deduct points only if the balance covers them. Returns false otherwise.
pub async fn deduct_points(
    conn: &mut SqliteConnection,
    customer_id: i64,
    amount: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET points = points - ?1, updated_at = ?2 WHERE id = ?3 AND points >= ?1",
    )
    .bind(amount)
    .bind(now)
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Restart the visit cycle only if `visit_count` reached `required`.
/// Returns false otherwise.
pub async fn reset_visit_cycle(
    conn: &mut SqliteConnection,
    customer_id: i64,
    required: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET visit_count = 0, updated_at = ?1 WHERE id = ?2 AND visit_count >= ?3",
    )
    .bind(now)
    .bind(customer_id)
    .bind(required)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}
