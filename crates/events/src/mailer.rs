//! Fire-and-forget mail queue.
//!
//! [`Mailer`] fronts [`EmailDelivery`](crate::email::EmailDelivery) with a
//! bounded `mpsc` channel drained by a spawned worker task. Enqueueing never
//! blocks the caller and never fails the calling operation: delivery errors
//! and queue overflow are logged and dropped. Registration must succeed even
//! when the activation email cannot be sent.

use tokio::sync::mpsc;

use crate::email::{EmailConfig, EmailDelivery};

/// Bound on queued, not-yet-delivered emails.
const QUEUE_CAPACITY: usize = 256;

/// An email waiting in the outbound queue.
#[derive(Debug)]
struct OutboundEmail {
    to: String,
    activation_url: String,
}

/// Cheaply cloneable handle to the background mail worker.
#[derive(Clone)]
pub struct Mailer {
    tx: Option<mpsc::Sender<OutboundEmail>>,
}

impl Mailer {
    /// Spawn the delivery worker and return a handle to its queue.
    ///
    /// With `config: None` (SMTP not configured) the handle accepts and
    /// discards every email, logging each drop, so the rest of the system
    /// is oblivious to whether mail is wired up.
    pub fn spawn(config: Option<EmailConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("SMTP not configured; outbound emails will be dropped");
            return Self { tx: None };
        };

        let (tx, mut rx) = mpsc::channel::<OutboundEmail>(QUEUE_CAPACITY);
        let delivery = EmailDelivery::new(config);

        tokio::spawn(async move {
            while let Some(mail) = rx.recv().await {
                if let Err(e) = delivery.send_activation(&mail.to, &mail.activation_url).await {
                    tracing::error!(to = %mail.to, error = %e, "Activation email delivery failed");
                }
            }
            tracing::info!("Mail worker stopped");
        });

        Self { tx: Some(tx) }
    }

    /// Queue an activation email. Never blocks and never errors.
    pub fn queue_activation(&self, to: &str, activation_url: &str) {
        let Some(tx) = &self.tx else {
            tracing::debug!(to, "Dropping activation email (SMTP not configured)");
            return;
        };

        let mail = OutboundEmail {
            to: to.to_string(),
            activation_url: activation_url.to_string(),
        };
        if let Err(e) = tx.try_send(mail) {
            tracing::error!(to, error = %e, "Mail queue full; dropping activation email");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A mailer without SMTP configuration must accept emails silently.
    #[tokio::test]
    async fn unconfigured_mailer_drops_without_error() {
        let mailer = Mailer::spawn(None);
        mailer.queue_activation("alice@example.com", "http://localhost/activate/abc");
    }

    /// Handles stay usable after cloning.
    #[tokio::test]
    async fn cloned_handle_shares_queue() {
        let mailer = Mailer::spawn(None);
        let clone = mailer.clone();
        clone.queue_activation("bob@example.com", "http://localhost/activate/def");
    }
}
