//! Delivery trait and message type.

use std::future::Future;

use thiserror::Error;

/// A composed outreach email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Why a message could not be handed off. The `Display` text is what ends up
/// after `send_error:` in the lead's status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("invalid address {address:?}: {reason}")]
    Address { address: String, reason: String },

    #[error("message build failed: {0}")]
    Message(String),

    #[error("{0}")]
    Transport(String),
}

/// Send capability for composed messages.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        email: &OutboundEmail,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
