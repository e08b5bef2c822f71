//! Booking Repository
//!
//! Every write bumps `version`. Conditional writes return `false` when the
//! row changed underneath the caller.

use super::RepoResult;
use shared::models::{Booking, BookingStatus};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const BOOKING_SELECT: &str = "SELECT id, tenant_id, customer_id, service_id, staff_member_id, booking_date, status, notes, reminder_sent, reminder_24h_sent, version, created_at, updated_at FROM booking";

/// Which reminder flag a query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// ~30 minutes before the appointment
    Soon,
    /// ~24 hours before the appointment
    DayBefore,
}

impl ReminderKind {
    fn column(&self) -> &'static str {
        match self {
            ReminderKind::Soon => "reminder_sent",
            ReminderKind::DayBefore => "reminder_24h_sent",
        }
    }
}

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<Booking>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{BOOKING_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Booking>> {
    let sql = format!("{BOOKING_SELECT} WHERE customer_id = ? ORDER BY booking_date DESC");
    let rows = sqlx::query_as::<_, Booking>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn insert<'e, E>(exec: E, booking: &Booking) -> RepoResult<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO booking (id, tenant_id, customer_id, service_id, staff_member_id, booking_date, status, notes, reminder_sent, reminder_24h_sent, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )
    .bind(booking.id)
    .bind(booking.tenant_id)
    .bind(booking.customer_id)
    .bind(booking.service_id)
    .bind(booking.staff_member_id)
    .bind(booking.booking_date)
    .bind(booking.status)
    .bind(&booking.notes)
    .bind(booking.reminder_sent)
    .bind(booking.reminder_24h_sent)
    .bind(booking.version)
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

/// Write `next` if the stored row is still at `expected_version`.
/// On success the stored version becomes `expected_version + 1`.
pub async fn update_if_version(
    conn: &mut SqliteConnection,
    next: &Booking,
    expected_version: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE booking SET service_id = ?1, staff_member_id = ?2, booking_date = ?3, status = ?4, notes = ?5, reminder_sent = ?6, reminder_24h_sent = ?7, version = version + 1, updated_at = ?8 WHERE id = ?9 AND version = ?10",
    )
    .bind(next.service_id)
    .bind(next.staff_member_id)
    .bind(next.booking_date)
    .bind(next.status)
    .bind(&next.notes)
    .bind(next.reminder_sent)
    .bind(next.reminder_24h_sent)
    .bind(next.updated_at)
    .bind(next.id)
    .bind(expected_version)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Check-and-set of the status column
pub async fn transition_status(
    conn: &mut SqliteConnection,
    id: i64,
    from: BookingStatus,
    to: BookingStatus,
    expected_version: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE booking SET status = ?1, version = version + 1, updated_at = ?2 WHERE id = ?3 AND status = ?4 AND version = ?5",
    )
    .bind(to)
    .bind(now)
    .bind(id)
    .bind(from)
    .bind(expected_version)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Confirmed bookings starting in `[from, to]` whose reminder is still unsent
pub async fn find_due_reminders(
    pool: &SqlitePool,
    kind: ReminderKind,
    from: i64,
    to: i64,
) -> RepoResult<Vec<Booking>> {
    let sql = format!(
        "{BOOKING_SELECT} WHERE status = 'confirmed' AND {} = 0 AND booking_date BETWEEN ? AND ? ORDER BY booking_date",
        kind.column()
    );
    let rows = sqlx::query_as::<_, Booking>(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Set the reminder flag if it is still unset. Only the caller that flips
/// the flag gets `true`.
pub async fn claim_reminder(pool: &SqlitePool, id: i64, kind: ReminderKind) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let column = kind.column();
    let sql = format!(
        "UPDATE booking SET {column} = 1, version = version + 1, updated_at = ? WHERE id = ? AND {column} = 0"
    );
    let rows = sqlx::query(&sql).bind(now).bind(id).execute(pool).await?;
    Ok(rows.rows_affected() == 1)
}
