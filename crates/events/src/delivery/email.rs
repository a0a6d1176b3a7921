//! Email transports.
//!
//! [`SmtpTransport`] wraps the `lettre` async SMTP transport. Configuration
//! is loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `Ok(None)` and [`LogOnlyTransport`] should
//! be used instead.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{DeliveryError, EmailReceipt, EmailTransport, OutgoingEmail};

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "FreelanceBot <notifications@gigline.local>";

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" mailbox, optionally with a display name.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured. Fails if `SMTP_PORT` is set but is not a
    /// port number.
    ///
    /// | Variable        | Required | Default                                       |
    /// |-----------------|----------|-----------------------------------------------|
    /// | `SMTP_HOST`     | yes      |                                               |
    /// | `SMTP_PORT`     | no       | `587`                                         |
    /// | `SMTP_FROM`     | no       | `FreelanceBot <notifications@gigline.local>`  |
    /// | `SMTP_USER`     | no       |                                               |
    /// | `SMTP_PASSWORD` | no       |                                               |
    pub fn from_env() -> Result<Option<Self>, String> {
        let Ok(smtp_host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };
        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_smtp_port(std::env::var("SMTP_PORT").ok().as_deref())?,
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        }))
    }
}

fn parse_smtp_port(raw: Option<&str>) -> Result<u16, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SMTP_PORT);
    };
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(format!("SMTP_PORT must be a valid port number, got '{raw}'")),
    }
}

// ---------------------------------------------------------------------------
// SmtpTransport
// ---------------------------------------------------------------------------

/// Sends HTML emails through an SMTP relay.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    /// Build the mailer once; connections are pooled by `lettre`.
    pub fn new(config: &EmailConfig) -> Result<Self, DeliveryError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, DeliveryError> {
        let message_id = format!("<{}@gigline>", uuid::Uuid::new_v4());

        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| DeliveryError::Build(e.to_string()))?;

        self.mailer.send(message).await?;

        Ok(EmailReceipt { id: message_id })
    }
}

// ---------------------------------------------------------------------------
// LogOnlyTransport
// ---------------------------------------------------------------------------

/// Used when SMTP is not configured: records the email in the log and
/// reports it as accepted.
#[derive(Debug, Default)]
pub struct LogOnlyTransport;

#[async_trait]
impl EmailTransport for LogOnlyTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, DeliveryError> {
        let id = format!("log-{}", uuid::Uuid::new_v4());
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            receipt_id = %id,
            "SMTP not configured, email logged instead of sent"
        );
        Ok(EmailReceipt { id })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            smtp_user: None,
            smtp_password: None,
        }
    }

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(matches!(EmailConfig::from_env(), Ok(None)));
    }

    #[test]
    fn smtp_port_defaults_when_unset() {
        assert_eq!(parse_smtp_port(None), Ok(DEFAULT_SMTP_PORT));
        assert_eq!(parse_smtp_port(Some(" 2525 ")), Ok(2525));
    }

    #[test]
    fn malformed_smtp_port_is_an_error() {
        for raw in ["smtp", "70000", "0", ""] {
            let err = parse_smtp_port(Some(raw)).unwrap_err();
            assert!(err.starts_with("SMTP_PORT must be a valid port number"), "{err}");
        }
    }

    #[test]
    fn default_sender_parses_as_mailbox() {
        let mailbox: Mailbox = DEFAULT_FROM_ADDRESS.parse().unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("FreelanceBot"));
        assert_eq!(mailbox.email.to_string(), "notifications@gigline.local");
    }

    #[test]
    fn invalid_sender_is_rejected_at_construction() {
        let mut cfg = config();
        cfg.from_address = "not-an-email".to_string();
        assert!(matches!(
            SmtpTransport::new(&cfg),
            Err(DeliveryError::Address(_))
        ));
    }

    #[test]
    fn delivery_error_display_build() {
        let err = DeliveryError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[tokio::test]
    async fn log_only_transport_accepts_everything() {
        let receipt = LogOnlyTransport
            .send(&OutgoingEmail {
                to: "c1@example.com".to_string(),
                subject: "Hi".to_string(),
                html_body: "<p>Hi</p>".to_string(),
            })
            .await
            .unwrap();
        assert!(receipt.id.starts_with("log-"));
    }
}
