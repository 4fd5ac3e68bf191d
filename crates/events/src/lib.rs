//! Outbound notification infrastructure.
//!
//! - [`email`] — SMTP delivery of activation emails via `lettre`.
//! - [`mailer`] — fire-and-forget queue in front of the SMTP transport, so
//!   callers never block on (or fail because of) email delivery.

pub mod email;
pub mod mailer;

pub use email::{EmailConfig, EmailDelivery};
pub use mailer::Mailer;
