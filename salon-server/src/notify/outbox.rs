//! Email Outbox - 持久化邮件队列
//!
//! The dispatcher only enqueues; [`EmailWorker`] delivers. Failed sends are
//! retried with exponential backoff and dead-lettered after
//! [`MAX_ATTEMPTS`]. Dead letters stay in the table until re-queued.

use super::mailer::{Mailer, OutgoingEmail};
use crate::db::repository::{RepoResult, outbox};
use shared::models::{OutboxEmail, OutboxStatus};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Outbox worker configuration
pub const MAX_ATTEMPTS: i64 = 5;
const RETRY_BASE_DELAY_SECS: i64 = 30;
const RETRY_MAX_DELAY_SECS: i64 = 30 * 60;
const QUEUE_SCAN_INTERVAL_SECS: u64 = 30;
const BATCH_SIZE: i64 = 50;

/// Delay before attempt `attempts + 1`, given `attempts` failures so far
pub fn backoff_secs(attempts: i64) -> i64 {
    let exp = (attempts - 1).clamp(0, 16) as u32;
    (RETRY_BASE_DELAY_SECS * 2i64.pow(exp)).min(RETRY_MAX_DELAY_SECS)
}

/// Enqueue side of the outbox (cheap to clone)
#[derive(Clone)]
pub struct EmailOutbox {
    pool: SqlitePool,
    wake: Arc<Notify>,
}

impl EmailOutbox {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            wake: Arc::new(Notify::new()),
        }
    }

    /// Persist an email for delivery and wake the worker
    pub async fn enqueue(
        &self,
        email: OutgoingEmail,
        notification_id: Option<i64>,
        tenant_id: Option<i64>,
    ) -> RepoResult<OutboxEmail> {
        let now = shared::util::now_millis();
        let entry = OutboxEmail {
            id: shared::util::snowflake_id(),
            notification_id,
            tenant_id,
            from_address: email.from,
            to_address: email.to,
            reply_to: email.reply_to,
            subject: email.subject,
            body: email.body,
            status: OutboxStatus::Pending,
            attempts: 0,
            last_error: None,
            next_attempt_at: now,
            created_at: now,
            sent_at: None,
        };
        outbox::insert(&self.pool, &entry).await?;
        self.wake.notify_one();
        Ok(entry)
    }

    /// Move a dead letter back to the queue
    pub async fn retry_dead(&self, id: i64) -> RepoResult<bool> {
        let requeued = outbox::requeue_dead(&self.pool, id, shared::util::now_millis()).await?;
        if requeued {
            self.wake.notify_one();
        }
        Ok(requeued)
    }

    /// Build a worker that drains this outbox through `mailer`
    pub fn worker(&self, mailer: Arc<dyn Mailer>) -> EmailWorker {
        EmailWorker {
            pool: self.pool.clone(),
            mailer,
            wake: self.wake.clone(),
        }
    }
}

/// Delivers queued emails
pub struct EmailWorker {
    pool: SqlitePool,
    mailer: Arc<dyn Mailer>,
    wake: Arc<Notify>,
}

impl EmailWorker {
    /// Run until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("EmailWorker started");

        // Deliver anything left over from a previous run
        self.process_due().await;

        let mut scan_interval =
            tokio::time::interval(Duration::from_secs(QUEUE_SCAN_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("EmailWorker shutting down");
                    break;
                }
                _ = self.wake.notified() => {
                    self.process_due().await;
                }
                // Periodic queue scan for retries
                _ = scan_interval.tick() => {
                    self.process_due().await;
                }
            }
        }
    }

    /// Attempt every due entry once. Returns the number delivered.
    pub async fn process_due(&self) -> usize {
        let now = shared::util::now_millis();
        let due = match outbox::find_due(&self.pool, now, BATCH_SIZE).await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load due emails");
                return 0;
            }
        };
        if due.is_empty() {
            return 0;
        }

        tracing::debug!(count = due.len(), "Processing email outbox");

        let mut delivered = 0;
        for entry in due {
            if self.deliver(entry).await {
                delivered += 1;
            }
        }
        delivered
    }

    async fn deliver(&self, entry: OutboxEmail) -> bool {
        let email = OutgoingEmail {
            from: entry.from_address.clone(),
            to: entry.to_address.clone(),
            reply_to: entry.reply_to.clone(),
            subject: entry.subject.clone(),
            body: entry.body.clone(),
        };
        let attempts = entry.attempts + 1;
        let now = shared::util::now_millis();

        match self.mailer.send(&email).await {
            Ok(()) => {
                if let Err(e) = outbox::mark_sent(&self.pool, entry.id, attempts, now).await {
                    tracing::error!(email_id = entry.id, error = %e, "Failed to mark email sent");
                }
                tracing::info!(email_id = entry.id, to = %entry.to_address, subject = %entry.subject, "Email sent");
                true
            }
            Err(err) => {
                let error = err.to_string();
                let result = if attempts >= MAX_ATTEMPTS {
                    tracing::error!(
                        email_id = entry.id,
                        to = %entry.to_address,
                        attempts,
                        last_error = %error,
                        "Max attempts exceeded, moving email to dead letter queue"
                    );
                    outbox::mark_dead(&self.pool, entry.id, attempts, &error).await
                } else {
                    let next = now + backoff_secs(attempts) * 1000;
                    tracing::warn!(
                        email_id = entry.id,
                        to = %entry.to_address,
                        attempts,
                        error = %error,
                        "Email send failed, will retry"
                    );
                    outbox::schedule_retry(&self.pool, entry.id, attempts, &error, next).await
                };
                if let Err(e) = result {
                    tracing::error!(email_id = entry.id, error = %e, "Failed to record email failure");
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::notify::mailer::MemoryMailer;

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: "Salon Platform <noreply@salon.test>".into(),
            to: to.into(),
            reply_to: None,
            subject: "Hello".into(),
            body: "Body".into(),
        }
    }

    #[test]
    fn test_backoff_calculation() {
        assert_eq!(backoff_secs(1), 30);
        assert_eq!(backoff_secs(2), 60);
        assert_eq!(backoff_secs(3), 120);
        assert_eq!(backoff_secs(4), 240);
        assert_eq!(backoff_secs(7), 1800); // capped
        assert_eq!(backoff_secs(100), 1800);
    }

    #[tokio::test]
    async fn delivers_pending_email() {
        let db = DbService::in_memory().await.unwrap();
        let outbox = EmailOutbox::new(db.pool.clone());
        let mailer = Arc::new(MemoryMailer::new());
        let worker = outbox.worker(mailer.clone());

        let entry = outbox.enqueue(email("ann@example.com"), None, None).await.unwrap();
        assert_eq!(worker.process_due().await, 1);

        let stored = outbox::find_by_id(&db.pool, entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OutboxStatus::Sent);
        assert_eq!(stored.attempts, 1);
        assert!(stored.sent_at.is_some());
        assert_eq!(mailer.sent()[0].to, "ann@example.com");

        // Nothing left to do
        assert_eq!(worker.process_due().await, 0);
    }

    #[tokio::test]
    async fn failed_send_is_rescheduled_with_backoff() {
        let db = DbService::in_memory().await.unwrap();
        let outbox = EmailOutbox::new(db.pool.clone());
        let worker = outbox.worker(Arc::new(MemoryMailer::failing(1)));

        let entry = outbox.enqueue(email("ann@example.com"), None, None).await.unwrap();
        let before = shared::util::now_millis();
        assert_eq!(worker.process_due().await, 0);

        let stored = outbox::find_by_id(&db.pool, entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OutboxStatus::Pending);
        assert_eq!(stored.attempts, 1);
        assert!(stored.last_error.unwrap().contains("connection refused"));
        assert!(stored.next_attempt_at >= before + 30_000);

        // Not due yet
        assert_eq!(worker.process_due().await, 0);
    }

    #[tokio::test]
    async fn exhausted_email_is_dead_lettered_and_can_be_requeued() {
        let db = DbService::in_memory().await.unwrap();
        let outbox = EmailOutbox::new(db.pool.clone());
        let mailer = Arc::new(MemoryMailer::failing(1));
        let worker = outbox.worker(mailer.clone());

        let entry = outbox.enqueue(email("ann@example.com"), None, None).await.unwrap();
        // One attempt left before the budget is spent
        sqlx::query("UPDATE email_outbox SET attempts = ? WHERE id = ?")
            .bind(MAX_ATTEMPTS - 1)
            .bind(entry.id)
            .execute(&db.pool)
            .await
            .unwrap();

        worker.process_due().await;
        let dead = outbox::find_dead(&db.pool).await.unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].attempts, MAX_ATTEMPTS);

        assert!(outbox.retry_dead(entry.id).await.unwrap());
        assert!(!outbox.retry_dead(entry.id).await.unwrap());
        assert_eq!(worker.process_due().await, 1);
        assert_eq!(mailer.sent().len(), 1);
    }
}
