//! SMTP email service implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{header::ContentType, Attachment as AttachmentPart, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, SmtpTransport, Transport,
};
use tracing::debug;

use crate::domain::communication::{
    email_addresses::{EmailAddress, EmailAddressError},
    errors::MailerError,
    mailer::{Mailer, Message},
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long, env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[clap(long, env = "SMTP_PORT")]
    pub port: u16,

    /// The SMTP username
    #[clap(long, env = "SMTP_USER")]
    pub username: String,

    /// The SMTP password
    #[clap(long, env = "SMTP_PASSWORD")]
    pub password: String,

    /// The sender email address
    #[clap(long, env = "SMTP_SENDER")]
    pub sender: String,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long, env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,
}

impl SMTPConfig {
    /// Loads the configuration from the environment, reading `.env` first if present.
    ///
    /// Fails if a required variable such as `SMTP_SENDER` is missing.
    #[mutants::skip]
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("no .env file loaded: {}", e);
        }

        Self::try_parse_from([env!("CARGO_PKG_NAME")]).context("invalid SMTP configuration")
    }

    /// The validated sender address
    pub fn sender_address(&self) -> Result<EmailAddress, EmailAddressError> {
        EmailAddress::new(&self.sender)
    }
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// Builds the SMTP transport for the configured relay
    #[mutants::skip]
    pub fn transport(&self) -> Result<SmtpTransport> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let relay = if self.config.starttls {
            SmtpTransport::starttls_relay(&self.config.host)?
        } else {
            SmtpTransport::relay(&self.config.host)?
        };

        let tls_parameters = TlsParameters::builder(self.config.host.to_string())
            .dangerous_accept_invalid_certs(!self.config.verify_tls)
            .build()?;

        let tls = if self.config.starttls {
            Tls::Required(tls_parameters)
        } else {
            Tls::Wrapper(tls_parameters)
        };

        Ok(relay
            .credentials(creds)
            .port(self.config.port)
            .tls(tls)
            .build())
    }
}

/// Converts a validated address into a mailbox.
///
/// lettre's parser rejects quoted local parts and domain literals that the
/// address grammar accepts, so those are passed through unchecked.
fn mailbox(address: &EmailAddress) -> Result<Mailbox, MailerError> {
    let parsed = match address.as_str().parse::<Address>() {
        Ok(parsed) => parsed,
        Err(_) => {
            let (user, domain) = address
                .as_str()
                .rsplit_once('@')
                .with_context(|| format!("cannot encode email address \"{address}\""))?;

            Address::new_dangerous(user, domain)
        }
    };

    Ok(Mailbox::new(None, parsed))
}

/// Converts a [`Message`] into a MIME message.
///
/// Without an attachment the body is a single `text/html` or `text/plain` part;
/// with one the message is `multipart/mixed` holding the HTML body and an
/// `application/octet-stream` part named after the attachment.
pub fn build_email(message: &Message) -> Result<lettre::Message, MailerError> {
    let mut builder = lettre::Message::builder()
        .from(mailbox(&message.from)?)
        .subject(message.subject.clone());

    for recipient in &message.to {
        builder = builder.to(mailbox(recipient)?);
    }

    let body = if message.is_html {
        SinglePart::html(message.body.clone())
    } else {
        SinglePart::plain(message.body.clone())
    };

    let email = match &message.attachment {
        Some(attachment) => {
            let content_type = ContentType::parse("application/octet-stream")
                .context("invalid attachment content type")?;

            builder.multipart(
                MultiPart::mixed().singlepart(body).singlepart(
                    AttachmentPart::new(attachment.name.clone())
                        .body(attachment.bytes.clone(), content_type),
                ),
            )?
        }
        None => builder.singlepart(body)?,
    };

    Ok(email)
}

#[async_trait]
impl Mailer for SMTPMailer {
    #[mutants::skip]
    async fn send(&self, message: &Message) -> Result<(), MailerError> {
        let email = build_email(message)?;

        debug!("sending email via {}:{}", self.config.host, self.config.port);

        self.transport()?.send(&email)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use testresult::TestResult;

    use crate::domain::communication::mailer::Attachment;

    use super::*;

    fn message(attachment: Option<Attachment>) -> Message {
        Message {
            to: vec![
                EmailAddress::new_unchecked("a@example.com"),
                EmailAddress::new_unchecked("b@example.com"),
            ],
            from: EmailAddress::new_unchecked("noreply@example.com"),
            subject: "Subject".to_string(),
            body: "<b>hi</b>".to_string(),
            is_html: true,
            attachment,
        }
    }

    fn formatted(email: &lettre::Message) -> TestResult<String> {
        Ok(String::from_utf8(email.formatted())?)
    }

    #[test]
    fn test_build_html_email() -> TestResult {
        let email = build_email(&message(None))?;
        let raw = formatted(&email)?;

        assert!(raw.contains("From: noreply@example.com"));
        assert!(raw.contains("a@example.com"));
        assert!(raw.contains("b@example.com"));
        assert!(raw.contains("Subject: Subject"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
        assert!(!raw.contains("multipart"));

        Ok(())
    }

    #[test]
    fn test_build_plain_email() -> TestResult {
        let mut message = message(None);
        message.is_html = false;

        let raw = formatted(&build_email(&message)?)?;

        assert!(raw.contains("Content-Type: text/plain; charset=utf-8"));
        assert!(!raw.contains("text/html"));

        Ok(())
    }

    #[test]
    fn test_build_email_with_attachment() -> TestResult {
        let bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
        let raw = formatted(&build_email(&message(Some(Attachment::new(
            "image.png",
            &bytes,
        ))))?)?;

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
        assert!(raw.contains("Content-Type: application/octet-stream"));
        assert!(raw.contains("filename=\"image.png\""));
        assert!(raw.contains(&STANDARD.encode(&bytes)));

        Ok(())
    }

    #[test]
    fn test_build_email_to_quoted_and_literal_addresses() -> TestResult {
        let mut message = message(None);
        message.to = vec![
            EmailAddress::new("\"john doe\"@example.com")?,
            EmailAddress::new("admin@[192.168.0.1]")?,
            EmailAddress::new("\"weird,chars;\"@example.com")?,
            EmailAddress::new("a@-x.com")?,
        ];

        let email = build_email(&message)?;
        let raw = formatted(&email)?;

        assert_eq!(email.envelope().to().len(), 4);
        assert!(raw.contains("\"john doe\"@example.com"));
        assert!(raw.contains("admin@[192.168.0.1]"));
        assert!(raw.contains("\"weird,chars;\"@example.com"));
        assert!(raw.contains("a@-x.com"));

        Ok(())
    }

    #[test]
    fn test_build_email_without_at_symbol_is_a_send_failure() {
        let mut message = message(None);
        message.to = vec![EmailAddress::new_unchecked("not an address")];

        assert!(matches!(
            build_email(&message),
            Err(MailerError::SendFailure(_))
        ));
    }

    #[test]
    fn test_config_from_args() -> TestResult {
        let config = SMTPConfig::try_parse_from([
            "mail-dispatcher",
            "--host",
            "smtp.example.com",
            "--port",
            "587",
            "--username",
            "user",
            "--password",
            "secret",
            "--sender",
            "noreply@example.com",
        ])?;

        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 587);
        assert!(config.verify_tls);
        assert!(config.starttls);
        assert_eq!(config.sender_address()?.as_str(), "noreply@example.com");

        Ok(())
    }

    #[test]
    fn test_invalid_sender_address() {
        let config = SMTPConfig {
            sender: "noreply".to_string(),
            ..SMTPConfig::default()
        };

        assert!(config.sender_address().is_err());
    }
}
