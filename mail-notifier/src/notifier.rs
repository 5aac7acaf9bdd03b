use crate::transport::MailTransport;
use redwatch_core::{DeliveryError, Notification};
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;

/// Upper bound on one delivery attempt so a stalled transport cannot stall
/// the monitor loop.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns notification delivery and its failure handling. Exactly one attempt
/// per notification; the caller never retries.
pub struct Notifier<T: MailTransport> {
    transport: T,
    timeout: Duration,
}

impl<T: MailTransport> Notifier<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DELIVERY_TIMEOUT,
        }
    }

    pub fn with_timeout(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Delivers `notification`, or records it when no recipient is
    /// configured. The recipient-less case is a valid degraded mode, not an
    /// error.
    pub async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        if notification.recipient.is_empty() {
            info!("No recipient configured, logging notification instead");
            info!("--- FALLBACK LOG ---");
            info!("Subject: {}", notification.subject);
            info!("Body:\n{}", notification.body);
            info!("--- END LOG ---");
            return Ok(());
        }

        info!(
            "Sending notification to {}: '{}'",
            notification.recipient, notification.subject
        );
        match timeout(self.timeout, self.transport.send(notification)).await {
            Ok(Ok(())) => {
                info!("Notification sent successfully: '{}'", notification.subject);
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(DeliveryError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}
