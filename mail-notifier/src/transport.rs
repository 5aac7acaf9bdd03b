use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use redwatch_core::{DeliveryError, EmailSettings, Notification};
use std::time::Duration;
use tracing::debug;

/// How long one SMTP conversation may take before the transport gives up.
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Mail-transport collaborator: one synchronous send per notification.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// SMTP over implicit TLS (SMTPS, classically port 465) with login auth.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings) -> Result<Self, DeliveryError> {
        let sender: Mailbox =
            settings
                .sender_email
                .parse()
                .map_err(|_| DeliveryError::InvalidAddress {
                    address: settings.sender_email.clone(),
                })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_server)
            .map_err(|e| DeliveryError::Transport {
                message: e.to_string(),
            })?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.sender_email.clone(),
                settings.sender_password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport, sender })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let recipient: Mailbox =
            notification
                .recipient
                .parse()
                .map_err(|_| DeliveryError::InvalidAddress {
                    address: notification.recipient.clone(),
                })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(notification.subject.clone())
            .body(notification.body.clone())
            .map_err(|e| DeliveryError::Transport {
                message: e.to_string(),
            })?;

        debug!("Opening SMTP conversation for '{}'", notification.subject);
        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Transport {
                message: e.to_string(),
            })?;
        Ok(())
    }
}
