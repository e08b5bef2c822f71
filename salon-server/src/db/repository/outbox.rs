//! Email Outbox Repository

use super::RepoResult;
use shared::models::OutboxEmail;
use sqlx::SqlitePool;

const OUTBOX_SELECT: &str = "SELECT id, notification_id, tenant_id, from_address, to_address, reply_to, subject, body, status, attempts, last_error, next_attempt_at, created_at, sent_at FROM email_outbox";

pub async fn insert(pool: &SqlitePool, email: &OutboxEmail) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO email_outbox (id, notification_id, tenant_id, from_address, to_address, reply_to, subject, body, status, attempts, last_error, next_attempt_at, created_at, sent_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(email.id)
    .bind(email.notification_id)
    .bind(email.tenant_id)
    .bind(&email.from_address)
    .bind(&email.to_address)
    .bind(&email.reply_to)
    .bind(&email.subject)
    .bind(&email.body)
    .bind(email.status)
    .bind(email.attempts)
    .bind(&email.last_error)
    .bind(email.next_attempt_at)
    .bind(email.created_at)
    .bind(email.sent_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OutboxEmail>> {
    let sql = format!("{OUTBOX_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, OutboxEmail>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Pending entries whose retry time has come, oldest first
pub async fn find_due(pool: &SqlitePool, now: i64, limit: i64) -> RepoResult<Vec<OutboxEmail>> {
    let sql = format!(
        "{OUTBOX_SELECT} WHERE status = 'pending' AND next_attempt_at <= ? ORDER BY next_attempt_at, id LIMIT ?"
    );
    let rows = sqlx::query_as::<_, OutboxEmail>(&sql)
        .bind(now)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_dead(pool: &SqlitePool) -> RepoResult<Vec<OutboxEmail>> {
    let sql = format!("{OUTBOX_SELECT} WHERE status = 'dead' ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, OutboxEmail>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// All entries addressed to `to_address` (any status), oldest first
pub async fn find_by_recipient(pool: &SqlitePool, to_address: &str) -> RepoResult<Vec<OutboxEmail>> {
    let sql = format!("{OUTBOX_SELECT} WHERE to_address = ? ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, OutboxEmail>(&sql)
        .bind(to_address)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn mark_sent(pool: &SqlitePool, id: i64, attempts: i64, now: i64) -> RepoResult<()> {
    sqlx::query(
        "UPDATE email_outbox SET status = 'sent', attempts = ?1, last_error = NULL, sent_at = ?2 WHERE id = ?3",
    )
    .bind(attempts)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Record a failed attempt and schedule the next one
pub async fn schedule_retry(
    pool: &SqlitePool,
    id: i64,
    attempts: i64,
    error: &str,
    next_attempt_at: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE email_outbox SET attempts = ?1, last_error = ?2, next_attempt_at = ?3 WHERE id = ?4",
    )
    .bind(attempts)
    .bind(error)
    .bind(next_attempt_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_dead(pool: &SqlitePool, id: i64, attempts: i64, error: &str) -> RepoResult<()> {
    sqlx::query(
        "UPDATE email_outbox SET status = 'dead', attempts = ?1, last_error = ?2 WHERE id = ?3",
    )
    .bind(attempts)
    .bind(error)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Move a dead entry back to pending with a fresh attempt budget
pub async fn requeue_dead(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE email_outbox SET status = 'pending', attempts = 0, next_attempt_at = ?1 WHERE id = ?2 AND status = 'dead'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
