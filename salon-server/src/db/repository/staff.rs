//! Staff Member Repository

use super::RepoResult;
use shared::models::{StaffCreate, StaffMember};
use sqlx::{SqliteExecutor, SqlitePool};

const STAFF_SELECT: &str =
    "SELECT id, tenant_id, name, email, phone, is_active, created_at FROM staff_member";

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<StaffMember>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{STAFF_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, StaffMember>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn find_by_tenant(pool: &SqlitePool, tenant_id: i64) -> RepoResult<Vec<StaffMember>> {
    let sql = format!("{STAFF_SELECT} WHERE tenant_id = ? AND is_active = 1 ORDER BY name");
    let rows = sqlx::query_as::<_, StaffMember>(&sql)
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &StaffCreate) -> RepoResult<StaffMember> {
    let staff = StaffMember {
        id: shared::util::snowflake_id(),
        tenant_id: data.tenant_id,
        name: data.name.trim().to_string(),
        email: data.email.clone().filter(|e| !e.trim().is_empty()),
        phone: data.phone.clone(),
        is_active: true,
        created_at: shared::util::now_millis(),
    };
    sqlx::query(
        "INSERT INTO staff_member (id, tenant_id, name, email, phone, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
    )
    .bind(staff.id)
    .bind(staff.tenant_id)
    .bind(&staff.name)
    .bind(&staff.email)
    .bind(&staff.phone)
    .bind(staff.created_at)
    .execute(pool)
    .await?;
    Ok(staff)
}
