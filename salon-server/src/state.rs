//! Shared application state

use crate::bookings::BookingLifecycle;
use crate::config::Config;
use crate::directory::Directory;
use crate::loyalty::VisitLedger;
use crate::notify::{
    EmailOutbox, EmailWorker, Mailer, NotificationDispatcher, NotificationHub, SenderIdentity,
};
use crate::reminders::ReminderScheduler;
use crate::tenants::TenantRegistry;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state (cheap to clone)
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    /// Realtime notification fan-out (WebSocket subscribers)
    pub hub: NotificationHub,
    pub dispatcher: NotificationDispatcher,
    pub outbox: EmailOutbox,
    pub bookings: BookingLifecycle,
    pub visits: VisitLedger,
    pub tenants: TenantRegistry,
    pub directory: Directory,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let hub = NotificationHub::new();
        let outbox = EmailOutbox::new(pool.clone());
        let dispatcher = NotificationDispatcher::new(
            pool.clone(),
            Arc::new(hub.clone()),
            outbox.clone(),
            SenderIdentity {
                platform_name: config.platform_name.clone(),
                address: config.email_from_address.clone(),
            },
        );
        let visits = VisitLedger::new(pool.clone());
        let bookings = BookingLifecycle::new(
            pool.clone(),
            dispatcher.clone(),
            visits.clone(),
            config.review_base_url.clone(),
        );

        Self {
            tenants: TenantRegistry::new(pool.clone(), dispatcher.clone()),
            directory: Directory::new(pool.clone(), dispatcher.clone()),
            pool,
            config: Arc::new(config),
            hub,
            dispatcher,
            outbox,
            bookings,
            visits,
        }
    }

    /// Worker that delivers this state's email outbox through `mailer`
    pub fn email_worker(&self, mailer: Arc<dyn Mailer>) -> EmailWorker {
        self.outbox.worker(mailer)
    }

    pub fn reminder_scheduler(&self) -> ReminderScheduler {
        ReminderScheduler::new(self.pool.clone(), self.dispatcher.clone())
    }
}
