//! Leadflow Mail: delivery adapter for outreach emails.
//!
//! Provides the `Mailer` trait. `SmtpMailer` hands messages to a plain SMTP
//! relay (e.g. MailHog on localhost:1025); `RecordingMailer` keeps them in
//! memory for tests.

pub mod mailer;
pub mod recording;
pub mod smtp;

pub use mailer::{DeliveryError, Mailer, OutboundEmail};
pub use recording::RecordingMailer;
pub use smtp::SmtpMailer;
