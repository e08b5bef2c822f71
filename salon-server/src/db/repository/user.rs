//! Admin User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserRole};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, tenant_id, name, email, role, created_at FROM app_user";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &UserCreate) -> RepoResult<User> {
    match (data.role, data.tenant_id) {
        (UserRole::TenantAdmin, None) => {
            return Err(RepoError::Validation(
                "tenant_admin users must belong to a tenant".into(),
            ));
        }
        (UserRole::PlatformAdmin, Some(_)) => {
            return Err(RepoError::Validation(
                "platform_admin users cannot belong to a tenant".into(),
            ));
        }
        _ => {}
    }

    let user = User {
        id: shared::util::snowflake_id(),
        tenant_id: data.tenant_id,
        name: data.name.trim().to_string(),
        email: data.email.clone(),
        role: data.role,
        created_at: shared::util::now_millis(),
    };
    sqlx::query(
        "INSERT INTO app_user (id, tenant_id, name, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(user.id)
    .bind(user.tenant_id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.role)
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(user)
}

/// The tenant's primary admin (earliest created `tenant_admin`)
pub async fn find_tenant_admin(pool: &SqlitePool, tenant_id: i64) -> RepoResult<Option<User>> {
    let sql = format!(
        "{USER_SELECT} WHERE tenant_id = ? AND role = 'tenant_admin' ORDER BY created_at, id LIMIT 1"
    );
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_tenant_admins(pool: &SqlitePool, tenant_id: i64) -> RepoResult<Vec<User>> {
    let sql =
        format!("{USER_SELECT} WHERE tenant_id = ? AND role = 'tenant_admin' ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, User>(&sql)
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_platform_admins(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE role = 'platform_admin' ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}
