//! Visit Repository

use super::RepoResult;
use shared::models::Visit;
use sqlx::{SqliteConnection, SqlitePool};

const VISIT_SELECT: &str = "SELECT id, tenant_id, customer_id, staff_member_id, booking_id, visit_date, total_amount, payment_status, notes, created_at FROM visit";

/// Insert a visit row. A visit whose `booking_id` already has a visit is
/// skipped and `false` is returned.
pub async fn insert(conn: &mut SqliteConnection, visit: &Visit) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT INTO visit (id, tenant_id, customer_id, staff_member_id, booking_id, visit_date, total_amount, payment_status, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) ON CONFLICT(booking_id) DO NOTHING",
    )
    .bind(visit.id)
    .bind(visit.tenant_id)
    .bind(visit.customer_id)
    .bind(visit.staff_member_id)
    .bind(visit.booking_id)
    .bind(visit.visit_date)
    .bind(visit.total_amount)
    .bind(visit.payment_status)
    .bind(&visit.notes)
    .bind(visit.created_at)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

pub async fn add_services(
    conn: &mut SqliteConnection,
    visit_id: i64,
    service_ids: &[i64],
) -> RepoResult<()> {
    for service_id in service_ids {
        sqlx::query(
            "INSERT INTO visit_service (visit_id, service_id) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
        )
        .bind(visit_id)
        .bind(service_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn load_service_ids(pool: &SqlitePool, visit: &mut Visit) -> RepoResult<()> {
    visit.service_ids = sqlx::query_scalar::<_, i64>(
        "SELECT service_id FROM visit_service WHERE visit_id = ? ORDER BY service_id",
    )
    .bind(visit.id)
    .fetch_all(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Visit>> {
    let sql = format!("{VISIT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Visit>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(mut visit) => {
            load_service_ids(pool, &mut visit).await?;
            Ok(Some(visit))
        }
        None => Ok(None),
    }
}

pub async fn find_by_booking(pool: &SqlitePool, booking_id: i64) -> RepoResult<Option<Visit>> {
    let sql = format!("{VISIT_SELECT} WHERE booking_id = ?");
    let row = sqlx::query_as::<_, Visit>(&sql)
        .bind(booking_id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(mut visit) => {
            load_service_ids(pool, &mut visit).await?;
            Ok(Some(visit))
        }
        None => Ok(None),
    }
}

pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Visit>> {
    let sql = format!("{VISIT_SELECT} WHERE customer_id = ? ORDER BY visit_date DESC");
    let mut rows = sqlx::query_as::<_, Visit>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    for visit in rows.iter_mut() {
        load_service_ids(pool, visit).await?;
    }
    Ok(rows)
}

pub async fn count_by_booking(pool: &SqlitePool, booking_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visit WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
