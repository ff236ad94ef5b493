//!
//! # Outbound Mail
//!
//! A thin `Mailer` trait over SMTP so the password-reset flow can be tested
//! with a recording fake. The real implementation, `SmtpMailer`, drives a
//! pooled TLS connection through `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::AppError;

/// Subject line of the password-reset message.
pub const RESET_CODE_SUBJECT: &str = "Your Password Reset Code";

/// Plain-text body of the password-reset message.
pub fn reset_code_body(code: &str) -> String {
    format!("Your verification code is: {}", code)
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(smtp: &SmtpConfig) -> Result<Self, AppError> {
        let from = smtp.from.parse::<Mailbox>().map_err(|e| {
            AppError::InternalServerError(format!("Invalid MAIL_FROM address: {}", e))
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| {
                log::error!("failed to build SMTP transport for {}: {}", smtp.host, e);
                AppError::InternalServerError("Failed to configure mail transport".into())
            })?
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .port(smtp.port)
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let to_mailbox = to.parse::<Mailbox>().map_err(|e| {
            log::warn!("refusing to mail malformed address: {}", e);
            AppError::InternalServerError("Failed to send email".into())
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| {
                log::error!("failed to build email: {}", e);
                AppError::InternalServerError("Failed to send email".into())
            })?;

        self.transport.send(email).await.map_err(|e| {
            log::error!("SMTP delivery failed: {}", e);
            AppError::InternalServerError("Failed to send email".into())
        })?;

        Ok(())
    }
}
