//! Plain SMTP delivery via lettre.

use leadflow_core::{Error, SmtpSettings};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::mailer::{DeliveryError, Mailer, OutboundEmail};

/// Unencrypted, unauthenticated SMTP relay client.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    endpoint: String,
}

impl SmtpMailer {
    /// Build a mailer for the configured endpoint. An unparsable from-address
    /// is a configuration error; nothing is contacted until the first send.
    pub fn new(settings: &SmtpSettings) -> leadflow_core::Result<Self> {
        let from: Mailbox = settings.from.parse().map_err(|e| {
            Error::Config(format!("invalid from-address {:?}: {}", settings.from, e))
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            .port(settings.port)
            .timeout(Some(settings.timeout()))
            .build();

        let endpoint = format!("{}:{}", settings.host, settings.port);
        info!("SMTP mailer initialized: endpoint={}, from={}", endpoint, from);

        Ok(Self {
            transport,
            from,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        let message = build_message(&self.from, email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        debug!("Delivered to {} via {}", email.to, self.endpoint);
        Ok(())
    }
}

/// Compose a plain-text message.
pub fn build_message(from: &Mailbox, email: &OutboundEmail) -> Result<Message, DeliveryError> {
    let to: Mailbox = email.to.parse().map_err(|e: lettre::address::AddressError| {
        DeliveryError::Address {
            address: email.to.clone(),
            reason: e.to_string(),
        }
    })?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| DeliveryError::Message(e.to_string()))
}
