//! E-mail notification of fresh postings through an SMTP relay.

pub mod template;

use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{MailConfig, SmtpSecurity};
use crate::constants::MAIL_SENDER_NAME;
use crate::posting::Posting;

pub use template::{render_email, EmailContent};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mail address {address}: {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("failed to build mail message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Sends notification mails through an authenticated relay.
///
/// Each call makes exactly one delivery attempt. Failures are returned to the
/// caller, never retried or swallowed.
pub struct Notifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl Notifier {
    /// Build a notifier from mail settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender address is invalid or the relay
    /// host cannot be used for TLS.
    pub fn new(mail: &MailConfig) -> Result<Self, NotifyError> {
        let sender = Mailbox::new(
            Some(MAIL_SENDER_NAME.to_string()),
            parse_address(&mail.smtp_user)?,
        );

        let builder = match mail.smtp_security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&mail.smtp_host)?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.smtp_host)?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&mail.smtp_host)
            }
        };
        let builder = match mail.smtp_port {
            Some(port) => builder.port(port),
            None => builder,
        };

        let transport = builder
            .credentials(Credentials::new(
                mail.smtp_user.clone(),
                mail.smtp_password.clone(),
            ))
            .timeout(Some(mail.smtp_timeout))
            .build();

        Ok(Self { transport, sender })
    }

    /// Mail the postings to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient is invalid or the relay rejects or
    /// fails the delivery.
    pub async fn send(&self, postings: &[Posting], recipient: &str) -> Result<(), NotifyError> {
        let to = Mailbox::new(None, parse_address(recipient)?);
        let content = render_email(postings);
        let message = build_message(self.sender.clone(), to, content)?;

        debug!(recipient = %recipient, postings = postings.len(), "Sending notification mail");
        self.transport.send(message).await?;
        info!(recipient = %recipient, "Email sent");

        Ok(())
    }
}

fn build_message(from: Mailbox, to: Mailbox, content: EmailContent) -> Result<Message, NotifyError> {
    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(content.subject)
        .header(ContentType::TEXT_HTML)
        .body(content.html)?)
}

fn parse_address(address: &str) -> Result<lettre::Address, NotifyError> {
    address.trim().parse().map_err(|e| NotifyError::Address {
        address: address.to_string(),
        source: e,
    })
}
