//! Email sending via SMTP (lettre).
//!
//! When `email.mock` is enabled in configuration the message is logged
//! instead of sent, which keeps development and CI environments offline.

pub mod digest;

use crate::app_config;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Email sending result
pub type EmailResult<T> = Result<T, EmailError>;

/// Email errors
#[derive(Debug)]
pub enum EmailError {
    /// SMTP configuration error
    ConfigError(String),
    /// Email building error
    BuildError(lettre::error::Error),
    /// Email sending error
    SendError(lettre::transport::smtp::Error),
}

impl std::fmt::Display for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailError::ConfigError(msg) => write!(f, "Email config error: {}", msg),
            EmailError::BuildError(e) => write!(f, "Email build error: {}", e),
            EmailError::SendError(e) => write!(f, "Email send error: {}", e),
        }
    }
}

impl std::error::Error for EmailError {}

impl From<lettre::error::Error> for EmailError {
    fn from(e: lettre::error::Error) -> Self {
        EmailError::BuildError(e)
    }
}

impl From<lettre::transport::smtp::Error> for EmailError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        EmailError::SendError(e)
    }
}

/// Send an email using the configured SMTP transport.
pub async fn send_email(
    to: &str,
    subject: &str,
    body_text: &str,
    body_html: Option<&str>,
) -> EmailResult<()> {
    let config = app_config::email();

    if config.mock {
        log::info!("MOCK EMAIL:");
        log::info!("  To: {}", to);
        log::info!("  Subject: {}", subject);
        log::info!("  Body: {}", body_text);
        return Ok(());
    }

    let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
        .parse()
        .map_err(|e| EmailError::ConfigError(format!("Invalid from address: {}", e)))?;

    let to_string = to.to_string();
    let to: Mailbox = to
        .parse()
        .map_err(|e| EmailError::ConfigError(format!("Invalid to address: {}", e)))?;

    let email_builder = Message::builder().from(from).to(to).subject(subject);

    // Plain text only, or multipart with an HTML alternative.
    let email = if let Some(html) = body_html {
        email_builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(body_text.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html.to_string()),
                ),
        )?
    } else {
        email_builder
            .header(ContentType::TEXT_PLAIN)
            .body(body_text.to_string())?
    };

    let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

    let mailer = if config.smtp_tls {
        SmtpTransport::relay(&config.smtp_host)?
            .credentials(creds)
            .port(config.smtp_port)
            .build()
    } else {
        SmtpTransport::builder_dangerous(&config.smtp_host)
            .credentials(creds)
            .port(config.smtp_port)
            .build()
    };

    mailer.send(&email)?;

    log::info!("Email sent successfully to: {}", to_string);

    Ok(())
}
