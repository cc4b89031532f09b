//! In-memory mailer for tests and dry runs.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::mailer::{DeliveryError, Mailer, OutboundEmail};

/// Records every message; rejects configured recipients with a transport error.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    rejected: HashSet<String>,
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail deliveries to `address`.
    pub fn reject(mut self, address: impl Into<String>) -> Self {
        self.rejected.insert(address.into());
        self
    }

    /// Messages accepted so far, in send order.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        if self.rejected.contains(&email.to) {
            return Err(DeliveryError::Transport(format!(
                "recipient rejected: {}",
                email.to
            )));
        }
        self.sent.lock().push(email.clone());
        Ok(())
    }
}
