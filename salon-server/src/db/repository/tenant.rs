//! Tenant Repository

use super::{RepoError, RepoResult};
use shared::models::{EmailPreferences, Tenant, TenantCreate, TenantStatus};
use sqlx::{SqliteExecutor, SqlitePool};

const TENANT_SELECT: &str = "SELECT id, name, business_type, email, phone, email_from_name, status, email_cust_booking_received, email_cust_booking_approved, email_cust_booking_cancelled, email_cust_booking_rejected, email_cust_booking_no_show, email_cust_booking_rescheduled, email_cust_visit_thank_you, email_cust_booking_reminder, email_tenant_new_booking, email_tenant_booking_cancelled, email_tenant_new_customer, created_at, updated_at FROM tenant";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Tenant>> {
    let sql = format!("{TENANT_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Tenant>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<Tenant>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{TENANT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Tenant>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

/// Insert a new tenant in `pending` status with every email toggle enabled
pub async fn create<'e, E>(exec: E, data: &TenantCreate) -> RepoResult<Tenant>
where
    E: SqliteExecutor<'e>,
{
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let prefs = EmailPreferences::default();
    let tenant = Tenant {
        id,
        name: data.name.trim().to_string(),
        business_type: data.business_type,
        email: data.email.clone(),
        phone: data.phone.clone(),
        email_from_name: data.email_from_name.clone(),
        status: TenantStatus::Pending,
        email_preferences: prefs,
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        "INSERT INTO tenant (id, name, business_type, email, phone, email_from_name, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(tenant.id)
    .bind(&tenant.name)
    .bind(tenant.business_type)
    .bind(&tenant.email)
    .bind(&tenant.phone)
    .bind(&tenant.email_from_name)
    .bind(tenant.status)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(tenant)
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: TenantStatus) -> RepoResult<Tenant> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE tenant SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tenant {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tenant {id} not found")))
}

pub async fn update_preferences(
    pool: &SqlitePool,
    id: i64,
    prefs: &EmailPreferences,
) -> RepoResult<Tenant> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE tenant SET email_cust_booking_received = ?1, email_cust_booking_approved = ?2, email_cust_booking_cancelled = ?3, email_cust_booking_rejected = ?4, email_cust_booking_no_show = ?5, email_cust_booking_rescheduled = ?6, email_cust_visit_thank_you = ?7, email_cust_booking_reminder = ?8, email_tenant_new_booking = ?9, email_tenant_booking_cancelled = ?10, email_tenant_new_customer = ?11, updated_at = ?12 WHERE id = ?13",
    )
    .bind(prefs.email_cust_booking_received)
    .bind(prefs.email_cust_booking_approved)
    .bind(prefs.email_cust_booking_cancelled)
    .bind(prefs.email_cust_booking_rejected)
    .bind(prefs.email_cust_booking_no_show)
    .bind(prefs.email_cust_booking_rescheduled)
    .bind(prefs.email_cust_visit_thank_you)
    .bind(prefs.email_cust_booking_reminder)
    .bind(prefs.email_tenant_new_booking)
    .bind(prefs.email_tenant_booking_cancelled)
    .bind(prefs.email_tenant_new_customer)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tenant {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tenant {id} not found")))
}
