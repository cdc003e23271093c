/// Email service for password reset mail
use crate::config::EmailConfig;
use crate::error::{AppError, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

pub const PASSWORD_RESET_SUBJECT: &str = "Password Reset Request";

/// Async email transport wrapper (SMTP or no-op)
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    public_base_url: String,
}

impl EmailService {
    /// Build the email service from configuration.
    ///
    /// An empty mail server puts the service in no-op mode: messages are
    /// logged and dropped.
    pub fn new(config: &EmailConfig, public_base_url: &str) -> Result<Self> {
        let from = config
            .default_sender
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid MAIL_DEFAULT_SENDER: {}", e)))?;

        let transport = if config.server.trim().is_empty() {
            warn!("MAIL_SERVER not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if config.use_tls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                    .map_err(|e| {
                        AppError::Internal(format!("Failed to configure SMTP transport: {}", e))
                    })?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
            }
            .port(config.port);

            let builder = if let (Some(username), Some(password)) =
                (&config.username, &config.password)
            {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub fn password_reset_link(&self, token: &str) -> String {
        format!("{}/reset_password/{}", self.public_base_url, token)
    }

    /// Send the reset link for `token` to `recipient`.
    pub async fn send_password_reset(&self, recipient: &str, token: &str) -> Result<()> {
        let body = password_reset_body(&self.password_reset_link(token));
        self.send_mail(recipient, PASSWORD_RESET_SUBJECT, &body).await
    }

    async fn send_mail(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        if let Some(transport) = &self.transport {
            let to = recipient
                .parse::<Mailbox>()
                .map_err(|e| AppError::Email(format!("Invalid recipient email address: {}", e)))?;

            let email = Message::builder()
                .from(self.from.clone())
                .to(to)
                .subject(subject)
                .header(header::ContentType::TEXT_PLAIN)
                .body(body.to_string())
                .map_err(|e| AppError::Email(format!("Failed to build email message: {}", e)))?;

            transport
                .send(email)
                .await
                .map_err(|e| AppError::Email(format!("Failed to send email: {}", e)))?;
            info!(subject, "email sent successfully");
        } else {
            info!(
                subject,
                recipient, "Email service running in no-op mode; skipping actual send"
            );
        }
        Ok(())
    }
}

fn password_reset_body(link: &str) -> String {
    format!(
        "To reset your password, visit the following link:\n{}\n\
         If you did not make this request then simply ignore this email and no changes will be made.\n",
        link
    )
}
