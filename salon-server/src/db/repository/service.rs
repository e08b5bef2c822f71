//! Service Repository

use super::RepoResult;
use shared::models::{Service, ServiceCreate};
use sqlx::{SqliteExecutor, SqlitePool};

const SERVICE_SELECT: &str = "SELECT id, tenant_id, name, category, description, price, duration_minutes, is_active, created_at FROM service";

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<Service>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{SERVICE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Service>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn find_by_tenant(pool: &SqlitePool, tenant_id: i64) -> RepoResult<Vec<Service>> {
    let sql = format!("{SERVICE_SELECT} WHERE tenant_id = ? ORDER BY category, name");
    let rows = sqlx::query_as::<_, Service>(&sql)
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create<'e, E>(exec: E, data: &ServiceCreate) -> RepoResult<Service>
where
    E: SqliteExecutor<'e>,
{
    let service = Service {
        id: shared::util::snowflake_id(),
        tenant_id: data.tenant_id,
        name: data.name.trim().to_string(),
        category: data.category.clone(),
        description: data.description.clone(),
        price: data.price,
        duration_minutes: data.duration_minutes,
        is_active: true,
        created_at: shared::util::now_millis(),
    };
    sqlx::query(
        "INSERT INTO service (id, tenant_id, name, category, description, price, duration_minutes, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
    )
    .bind(service.id)
    .bind(service.tenant_id)
    .bind(&service.name)
    .bind(&service.category)
    .bind(&service.description)
    .bind(service.price)
    .bind(service.duration_minutes)
    .bind(service.created_at)
    .execute(exec)
    .await?;
    Ok(service)
}
