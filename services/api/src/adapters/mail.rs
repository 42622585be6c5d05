//! services/api/src/adapters/mail.rs
//!
//! This module contains the SMTP adapter. It implements the `MailService` port
//! from `portal_core` on top of `lettre`'s async transport.

use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portal_core::domain::OutboundEmail;
use portal_core::ports::{MailService, PortError, PortResult};
use tracing::info;

use crate::config::MailConfig;
use crate::error::ApiError;

/// The submission port that expects a plain connection upgraded with STARTTLS.
pub const STARTTLS_PORT: u16 = 587;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `MailService` port over SMTP.
#[derive(Clone)]
pub struct SmtpMailAdapter {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    sender_address: String,
}

impl SmtpMailAdapter {
    /// Creates a new `SmtpMailAdapter`. No connection is opened until the first send.
    ///
    /// Port 587 is reached with STARTTLS; every other port with implicit TLS.
    pub fn new(config: &MailConfig) -> Result<Self, ApiError> {
        let sender: Mailbox = config.mail_from.parse().map_err(|e: AddressError| {
            ApiError::Internal(format!("Invalid MAIL_FROM '{}': {}", config.mail_from, e))
        })?;

        let builder = if uses_starttls(config.smtp_port) {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        }
        .map_err(|e| ApiError::Internal(format!("Invalid SMTP relay: {}", e)))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender_address: sender.email.to_string(),
            sender,
        })
    }
}

fn uses_starttls(port: u16) -> bool {
    port == STARTTLS_PORT
}

fn to_mailbox(address: &str) -> PortResult<Mailbox> {
    address.parse().map_err(|e: AddressError| {
        PortError::Validation(format!("Invalid recipient '{}': {}", address, e))
    })
}

/// Builds one message for every recipient. The sender is the only visible
/// `To`; subscribers are blind-copied so they never see each other.
fn build_message(sender: &Mailbox, email: &OutboundEmail) -> PortResult<Message> {
    let mut builder = Message::builder()
        .from(sender.clone())
        .to(sender.clone())
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    for recipient in &email.recipients {
        builder = builder.bcc(to_mailbox(recipient.as_str())?);
    }

    builder
        .body(email.html_body.clone())
        .map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `MailService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MailService for SmtpMailAdapter {
    fn sender(&self) -> &str {
        &self.sender_address
    }

    #[tracing::instrument(name = "Send bulk email", skip(self, email), fields(recipients = email.recipients.len()))]
    async fn send_html(&self, email: &OutboundEmail) -> PortResult<()> {
        let message = build_message(&self.sender, email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        info!("Delivered '{}' to {} recipients", email.subject, email.recipients.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettre::Address;
    use portal_core::domain::EmailAddress;

    fn outbound(recipients: &[&str]) -> OutboundEmail {
        OutboundEmail {
            recipients: recipients
                .iter()
                .map(|r| EmailAddress::parse(r).unwrap())
                .collect(),
            subject: "March news".to_string(),
            html_body: "<html><body><p>Spring</p></body></html>".to_string(),
        }
    }

    fn sender() -> Mailbox {
        "newsletter@portal.example".parse().unwrap()
    }

    #[test]
    fn subscribers_are_blind_copied_behind_the_sender() {
        let message =
            build_message(&sender(), &outbound(&["one@example.com", "two@example.com"])).unwrap();

        let envelope_to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(Address::to_string)
            .collect();
        for expected in ["newsletter@portal.example", "one@example.com", "two@example.com"] {
            assert!(envelope_to.contains(&expected.to_string()), "{expected}");
        }

        let to = message.headers().get_raw("To").unwrap();
        assert!(to.contains("newsletter@portal.example"));
        assert!(!to.contains("one@example.com"));
        assert!(!to.contains("two@example.com"));
    }

    #[test]
    fn body_is_sent_as_html() {
        let message = build_message(&sender(), &outbound(&["one@example.com"])).unwrap();

        let content_type = message.headers().get_raw("Content-Type").unwrap();
        assert!(content_type.starts_with("text/html"));
        assert_eq!(message.headers().get_raw("Subject"), Some("March news"));
    }

    #[test]
    fn only_the_submission_port_upgrades_with_starttls() {
        assert!(uses_starttls(587));
        assert!(!uses_starttls(465));
        assert!(!uses_starttls(25));
    }

    #[test]
    fn unparseable_recipients_are_rejected() {
        assert!(matches!(
            to_mailbox("not an address"),
            Err(PortError::Validation(_))
        ));
        assert!(to_mailbox("one@example.com").is_ok());
    }
}
