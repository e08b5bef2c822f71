//! Notification subsystem
//!
//! - [`dispatcher`]: the single entry point for creating notifications
//! - [`policy`]: tenant email toggles per notification kind
//! - [`hub`]: per-tenant realtime fan-out
//! - [`outbox`]: durable email queue and delivery worker
//! - [`mailer`]: email transports

pub mod dispatcher;
pub mod hub;
pub mod mailer;
pub mod outbox;
pub mod policy;

pub use dispatcher::{NotificationDispatcher, NotificationRequest, Recipient, SenderIdentity};
pub use hub::{HubEvent, NotificationHub, RealtimeRelay};
pub use mailer::{LogMailer, Mailer, MemoryMailer, OutgoingEmail, SmtpMailer};
pub use outbox::{EmailOutbox, EmailWorker};
