//! Appointment reminders
//!
//! Once a minute, confirmed bookings that are about 30 minutes or about 24
//! hours away get a reminder. The booking's reminder flag is claimed before
//! the notification goes out, so each reminder is sent at most once.

use crate::bookings::messages::{self, MessageContext};
use crate::db::repository::booking::{self, ReminderKind};
use crate::db::repository::{customer, service};
use crate::notify::{NotificationDispatcher, NotificationRequest, Recipient};
use shared::models::{Booking, NotificationEvent};
use sqlx::SqlitePool;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const SCAN_INTERVAL: Duration = Duration::from_secs(60);
const MINUTE_MS: i64 = 60_000;

/// Start-time window `[from, to]` (ms) of bookings due for `kind` at `now`
pub fn reminder_window(kind: ReminderKind, now: i64) -> (i64, i64) {
    match kind {
        ReminderKind::Soon => (now + 25 * MINUTE_MS, now + 35 * MINUTE_MS),
        ReminderKind::DayBefore => (now + 23 * 60 * MINUTE_MS, now + 25 * 60 * MINUTE_MS),
    }
}

#[derive(Clone)]
pub struct ReminderScheduler {
    pool: SqlitePool,
    dispatcher: NotificationDispatcher,
}

impl ReminderScheduler {
    pub fn new(pool: SqlitePool, dispatcher: NotificationDispatcher) -> Self {
        Self { pool, dispatcher }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("Reminder scheduler started");
        let mut interval = tokio::time::interval(SCAN_INTERVAL);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Reminder scheduler shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.tick(shared::util::now_millis()).await;
                }
            }
        }
    }

    /// Send every reminder due at `now`. Returns how many were sent.
    pub async fn tick(&self, now: i64) -> usize {
        let mut sent = 0;
        for kind in [ReminderKind::Soon, ReminderKind::DayBefore] {
            let (from, to) = reminder_window(kind, now);
            let due = match booking::find_due_reminders(&self.pool, kind, from, to).await {
                Ok(due) => due,
                Err(e) => {
                    tracing::error!(?kind, error = %e, "Failed to load due reminders");
                    continue;
                }
            };
            for b in due {
                match booking::claim_reminder(&self.pool, b.id, kind).await {
                    Ok(true) => {
                        self.send(&b).await;
                        sent += 1;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!(booking_id = b.id, error = %e, "Failed to claim reminder")
                    }
                }
            }
        }
        if sent > 0 {
            tracing::info!(count = sent, "Appointment reminders sent");
        }
        sent
    }

    async fn send(&self, b: &Booking) {
        let customer_name = match customer::find_by_id(&self.pool, b.customer_id).await {
            Ok(Some(c)) => c.name,
            _ => "Customer".to_string(),
        };
        let service_name = match service::find_by_id(&self.pool, b.service_id).await {
            Ok(Some(s)) => s.name,
            _ => "your service".to_string(),
        };
        let ctx = MessageContext {
            customer_name: &customer_name,
            service_name: &service_name,
            booking_date: b.booking_date,
            review_link: None,
        };
        let Some((title, message)) = messages::render(NotificationEvent::BookingReminder, &ctx) else {
            return;
        };
        self.dispatcher
            .notify(
                NotificationRequest::new(
                    NotificationEvent::BookingReminder,
                    Recipient::Customer(b.customer_id),
                    title,
                    message,
                )
                .tenant(b.tenant_id),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_bracket_the_target_offsets() {
        let now = 1_000_000;
        let (from, to) = reminder_window(ReminderKind::Soon, now);
        assert!(from < now + 30 * MINUTE_MS && now + 30 * MINUTE_MS < to);

        let (from, to) = reminder_window(ReminderKind::DayBefore, now);
        assert_eq!(to - from, 2 * 60 * MINUTE_MS);
        assert!(from < now + 24 * 60 * MINUTE_MS);
    }
}
