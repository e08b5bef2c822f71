//! Email transports
//!
//! - [`SmtpMailer`]: SMTP relay via lettre (production)
//! - [`LogMailer`]: writes the email to the log instead of sending (development)
//! - [`MemoryMailer`]: keeps sent mail in memory, optionally failing (tests)

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// A fully addressed plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// `"Display Name <address>"`
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// SMTP transport (STARTTLS relay with optional credentials)
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
            .port(port);
        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn parse_mailbox(kind: &str, value: &str) -> Result<Mailbox, MailError> {
    value
        .parse::<Mailbox>()
        .map_err(|e| MailError::Address(format!("{kind} '{value}': {e}")))
}

/// Build the RFC 5322 message for an [`OutgoingEmail`]
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(parse_mailbox("from", &email.from)?)
        .to(parse_mailbox("to", &email.to)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox("reply-to", reply_to)?);
    }
    builder
        .body(email.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Development transport: logs instead of sending
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        // Same validation as SMTP so bad addresses surface in development
        build_message(email)?;
        tracing::info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            "Email (log transport)\n{}",
            email.body
        );
        Ok(())
    }
}

/// In-memory transport
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failures_remaining: AtomicUsize,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` sends with a transport error
    pub fn failing(n: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures_remaining: AtomicUsize::new(n),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(MailError::Transport("connection refused".into()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "Glow Studio <noreply@salon.test>".into(),
            to: "ann@example.com".into(),
            reply_to: Some("hello@glow.test".into()),
            subject: "Booking Confirmed".into(),
            body: "See you soon".into(),
        }
    }

    #[test]
    fn builds_message_with_reply_to() {
        let message = build_message(&email()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Reply-To: hello@glow.test"));
        assert!(raw.contains("Subject: Booking Confirmed"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        let mut bad = email();
        bad.to = "not-an-address".into();
        assert!(matches!(build_message(&bad), Err(MailError::Address(_))));
    }

    #[tokio::test]
    async fn memory_mailer_fails_then_recovers() {
        let mailer = MemoryMailer::failing(1);
        assert!(mailer.send(&email()).await.is_err());
        assert!(mailer.send(&email()).await.is_ok());
        assert_eq!(mailer.sent().len(), 1);
    }
}
