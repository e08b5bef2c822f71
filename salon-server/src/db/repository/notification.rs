//! Notification Repository

use super::RepoResult;
use shared::models::{Notification, RecipientType};
use sqlx::SqlitePool;

const NOTIFICATION_SELECT: &str = "SELECT id, tenant_id, recipient_type, customer_id, user_id, staff_member_id, event, title, message, is_read, created_at FROM notification";

pub async fn insert(pool: &SqlitePool, n: &Notification) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO notification (id, tenant_id, recipient_type, customer_id, user_id, staff_member_id, event, title, message, is_read, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(n.id)
    .bind(n.tenant_id)
    .bind(n.recipient_type)
    .bind(n.customer_id)
    .bind(n.user_id)
    .bind(n.staff_member_id)
    .bind(n.event)
    .bind(&n.title)
    .bind(&n.message)
    .bind(n.is_read)
    .bind(n.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Notifications of one recipient, newest first
pub async fn find_for_recipient(
    pool: &SqlitePool,
    recipient_type: RecipientType,
    recipient_id: i64,
    unread_only: bool,
) -> RepoResult<Vec<Notification>> {
    let column = match recipient_type {
        RecipientType::Customer => "customer_id",
        RecipientType::Admin => "user_id",
        RecipientType::Staff => "staff_member_id",
    };
    let unread = if unread_only { " AND is_read = 0" } else { "" };
    let sql = format!(
        "{NOTIFICATION_SELECT} WHERE {column} = ?{unread} ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, Notification>(&sql)
        .bind(recipient_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn mark_read(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
