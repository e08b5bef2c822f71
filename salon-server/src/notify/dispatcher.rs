//! Notification dispatcher
//!
//! One entry point for every in-app notification. Each call persists a
//! notification row, pushes it to realtime subscribers and, when allowed,
//! queues an email. Failures are logged and never reach the caller: a lost
//! notification must not fail the business operation that triggered it.

use super::hub::{HubEvent, RealtimeRelay};
use super::mailer::OutgoingEmail;
use super::outbox::EmailOutbox;
use super::policy;
use crate::db::repository::{RepoResult, customer, notification, staff, tenant, user};
use shared::models::{Notification, NotificationEvent, RecipientType, Tenant};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Who receives a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Customer(i64),
    /// Admin user (tenant or platform)
    Admin(i64),
    Staff(i64),
}

impl Recipient {
    pub fn recipient_type(&self) -> RecipientType {
        match self {
            Recipient::Customer(_) => RecipientType::Customer,
            Recipient::Admin(_) => RecipientType::Admin,
            Recipient::Staff(_) => RecipientType::Staff,
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            Recipient::Customer(id) | Recipient::Admin(id) | Recipient::Staff(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub event: NotificationEvent,
    pub recipient: Recipient,
    pub title: String,
    pub message: String,
    /// Defaults to the recipient's tenant
    pub tenant_id: Option<i64>,
    pub send_email: bool,
}

impl NotificationRequest {
    pub fn new(
        event: NotificationEvent,
        recipient: Recipient,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event,
            recipient,
            title: title.into(),
            message: message.into(),
            tenant_id: None,
            send_email: true,
        }
    }

    pub fn tenant(mut self, tenant_id: i64) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn in_app_only(mut self) -> Self {
        self.send_email = false;
        self
    }
}

/// Sender identity for outgoing mail
#[derive(Debug, Clone)]
pub struct SenderIdentity {
    pub platform_name: String,
    pub address: String,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    pool: SqlitePool,
    relay: Arc<dyn RealtimeRelay>,
    outbox: EmailOutbox,
    sender: SenderIdentity,
}

/// Contact details of a resolved recipient
struct Contact {
    email: Option<String>,
    tenant_id: Option<i64>,
}

impl NotificationDispatcher {
    pub fn new(
        pool: SqlitePool,
        relay: Arc<dyn RealtimeRelay>,
        outbox: EmailOutbox,
        sender: SenderIdentity,
    ) -> Self {
        Self {
            pool,
            relay,
            outbox,
            sender,
        }
    }

    /// Create a notification. Returns the stored row, or `None` if it could
    /// not be persisted.
    pub async fn notify(&self, req: NotificationRequest) -> Option<Notification> {
        let contact = match self.resolve(req.recipient).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                tracing::warn!(recipient = ?req.recipient, event = ?req.event, "Notification recipient not found");
                return None;
            }
            Err(e) => {
                tracing::error!(recipient = ?req.recipient, error = %e, "Failed to resolve notification recipient");
                return None;
            }
        };

        let tenant_id = req.tenant_id.or(contact.tenant_id);
        let tenant = match tenant_id {
            Some(id) => match tenant::find_by_id(&self.pool, id).await {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(tenant_id = id, error = %e, "Failed to load tenant for notification");
                    None
                }
            },
            None => None,
        };

        let (customer_id, user_id, staff_member_id) = match req.recipient {
            Recipient::Customer(id) => (Some(id), None, None),
            Recipient::Admin(id) => (None, Some(id), None),
            Recipient::Staff(id) => (None, None, Some(id)),
        };
        let record = Notification {
            id: shared::util::snowflake_id(),
            tenant_id,
            recipient_type: req.recipient.recipient_type(),
            customer_id,
            user_id,
            staff_member_id,
            event: req.event,
            title: req.title,
            message: req.message,
            is_read: false,
            created_at: shared::util::now_millis(),
        };

        if let Err(e) = notification::insert(&self.pool, &record).await {
            tracing::error!(event = ?record.event, error = %e, "Failed to persist notification");
            return None;
        }

        if let Some(tenant_id) = tenant_id {
            let event = HubEvent::NotificationCreated {
                notification: Box::new(record.clone()),
            };
            if let Err(e) = self.relay.relay(tenant_id, event) {
                tracing::warn!(notification_id = record.id, error = %e, "Realtime relay failed");
            }
        }

        if req.send_email {
            self.queue_email(&record, contact.email, tenant.as_ref()).await;
        }

        tracing::debug!(notification_id = record.id, event = ?record.event, "Notification created");
        Some(record)
    }

    /// Mark a notification read and tell realtime subscribers
    pub async fn mark_read(&self, id: i64) -> RepoResult<Option<Notification>> {
        if !notification::mark_read(&self.pool, id).await? {
            return Ok(None);
        }
        let updated = notification::find_by_id(&self.pool, id).await?;
        if let Some(n) = &updated
            && let Some(tenant_id) = n.tenant_id
            && let Err(e) = self
                .relay
                .relay(tenant_id, HubEvent::NotificationRead { notification_id: id })
        {
            tracing::warn!(notification_id = id, error = %e, "Realtime relay failed");
        }
        Ok(updated)
    }

    async fn resolve(&self, recipient: Recipient) -> RepoResult<Option<Contact>> {
        let contact = match recipient {
            Recipient::Customer(id) => customer::find_by_id(&self.pool, id).await?.map(|c| Contact {
                email: c.email,
                tenant_id: Some(c.tenant_id),
            }),
            Recipient::Admin(id) => user::find_by_id(&self.pool, id).await?.map(|u| Contact {
                email: u.email,
                tenant_id: u.tenant_id,
            }),
            Recipient::Staff(id) => staff::find_by_id(&self.pool, id).await?.map(|s| Contact {
                email: s.email,
                tenant_id: Some(s.tenant_id),
            }),
        };
        Ok(contact)
    }

    async fn queue_email(&self, record: &Notification, to: Option<String>, tenant: Option<&Tenant>) {
        let Some(to) = to.filter(|e| !e.trim().is_empty()) else {
            tracing::debug!(notification_id = record.id, "Recipient has no email address");
            return;
        };
        if !policy::email_allowed(record.event, tenant) {
            tracing::debug!(
                notification_id = record.id,
                event = ?record.event,
                "Email disabled by tenant preference"
            );
            return;
        }

        let email = OutgoingEmail {
            from: self.from_header(record.recipient_type, tenant),
            to,
            reply_to: tenant.and_then(|t| t.email.clone()),
            subject: record.title.clone(),
            body: record.message.clone(),
        };
        if let Err(e) = self
            .outbox
            .enqueue(email, Some(record.id), record.tenant_id)
            .await
        {
            tracing::error!(notification_id = record.id, error = %e, "Failed to queue email");
        }
    }

    /// Customers see the tenant's brand; admins and staff see the platform
    fn from_header(&self, recipient_type: RecipientType, tenant: Option<&Tenant>) -> String {
        let display = match (recipient_type, tenant) {
            (RecipientType::Customer, Some(t)) => t.brand_name(),
            _ => self.sender.platform_name.as_str(),
        };
        format!("{} <{}>", sanitize_display_name(display), self.sender.address)
    }
}

/// Strip characters that would break a `Name <addr>` header
fn sanitize_display_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | ',' | ';' | '\r' | '\n'))
        .collect();
    cleaned.trim().to_string()
}
