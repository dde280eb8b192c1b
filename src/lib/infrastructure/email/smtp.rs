//! SMTP transport implementation

use std::{fs, path::PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{header::ContentType, Attachment, Body, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Message, SmtpTransport, Transport,
};
use tracing::warn;

use crate::domain::communication::{
    errors::TransportError, mailer::Mailer, message::OutboundEmail,
};

/// SMTP relay configuration
#[derive(Clone, Debug, Parser)]
pub struct SmtpConfig {
    /// The relay host
    #[clap(long = "smtp-server", env = "SMTP_SERVER", default_value = "smtp.qq.com")]
    pub host: String,

    /// The relay port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,
}

/// SMTP mailer
///
/// Opens a fresh STARTTLS session to the relay for every send, mirroring the
/// one-message-per-session transport contract.
#[derive(Clone, Debug)]
pub struct SmtpMailer {
    config: SmtpConfig,
    username: String,
    password: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SmtpConfig, username: &str, password: &str) -> Self {
        Self {
            config,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let creds = Credentials::new(self.username.clone(), self.password.clone());

        Ok(SmtpTransport::starttls_relay(&self.config.host)?
            .credentials(creds)
            .port(self.config.port)
            .tls(Tls::Opportunistic(
                TlsParameters::builder(self.config.host.clone())
                    .dangerous_accept_invalid_certs(!self.config.verify_tls)
                    .build()?,
            ))
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        let message = build_message(email)?;

        let transport = self
            .transport()
            .map_err(|err| TransportError::Connection(err.to_string()))?;

        match transport.send(&message) {
            Ok(_) => Ok(()),
            Err(err) => Err(classify(&err)),
        }
    }
}

fn build_message(email: &OutboundEmail) -> Result<Message, TransportError> {
    let from: Mailbox = email
        .from
        .as_str()
        .parse()
        .map_err(|err| TransportError::Delivery(format!("invalid sender address: {err}")))?;
    let to: Mailbox = email
        .to
        .as_str()
        .parse()
        .map_err(|err| TransportError::Delivery(format!("invalid recipient address: {err}")))?;

    let builder = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone());

    let attachments = load_attachments(&email.attachments);

    let message = match (&email.html_body, attachments.is_empty()) {
        (Some(html), true) => builder.multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            html.clone(),
        )),
        (None, true) => builder.body(email.text_body.clone()),
        (Some(html), false) => {
            let mut mixed = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                html.clone(),
            ));
            for part in attachments {
                mixed = mixed.singlepart(part);
            }
            builder.multipart(mixed)
        }
        (None, false) => {
            let mut mixed =
                MultiPart::mixed().singlepart(SinglePart::plain(email.text_body.clone()));
            for part in attachments {
                mixed = mixed.singlepart(part);
            }
            builder.multipart(mixed)
        }
    };

    message.map_err(|err| TransportError::Delivery(err.to_string()))
}

/// Load attachment files, skipping any that are missing or unreadable.
///
/// A skipped attachment never fails the send for its recipient.
fn load_attachments(paths: &[PathBuf]) -> Vec<SinglePart> {
    paths
        .iter()
        .filter_map(|path| {
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable attachment");
                    return None;
                }
            };

            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let content_type = ContentType::parse("application/octet-stream").ok()?;

            Some(Attachment::new(filename).body(Body::new(bytes), content_type))
        })
        .collect()
}

fn classify(err: &lettre::transport::smtp::Error) -> TransportError {
    classify_text(&err.to_string())
}

/// Classify a relay failure from its response text.
///
/// SMTP code matching uses digit-segment boundaries so a code inside an
/// address or timestamp does not match.
fn classify_text(text: &str) -> TransportError {
    let lower = text.to_lowercase();

    if lower.contains("authentication")
        || lower.contains("invalid credentials")
        || contains_smtp_code(text, "535")
        || contains_smtp_code(text, "534")
    {
        TransportError::Authentication(text.to_string())
    } else if lower.contains("connection")
        || lower.contains("network")
        || lower.contains("timeout")
        || lower.contains("tls")
    {
        TransportError::Connection(text.to_string())
    } else {
        TransportError::Delivery(text.to_string())
    }
}

fn contains_smtp_code(text: &str, code: &str) -> bool {
    text.split(|c: char| !c.is_ascii_digit())
        .any(|segment| segment == code)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use crate::domain::communication::email_address::EmailAddress;

    use super::*;

    fn outbound(html: Option<&str>, attachments: Vec<PathBuf>) -> OutboundEmail {
        OutboundEmail {
            from: EmailAddress::new_unchecked("sender@example.com"),
            to: EmailAddress::new_unchecked("recipient@example.com"),
            subject: "greetings".to_string(),
            text_body: "hello".to_string(),
            html_body: html.map(String::from),
            attachments,
        }
    }

    #[test]
    fn test_classify_authentication_failures() {
        assert!(matches!(
            classify_text("permanent error (535): authentication failed"),
            TransportError::Authentication(_)
        ));
        assert!(matches!(
            classify_text("Invalid credentials for relay"),
            TransportError::Authentication(_)
        ));
    }

    #[test]
    fn test_classify_connection_failures() {
        assert!(matches!(
            classify_text("Connection error"),
            TransportError::Connection(_)
        ));
        assert!(matches!(
            classify_text("network error"),
            TransportError::Connection(_)
        ));
        assert!(matches!(classify_text("timeout"), TransportError::Connection(_)));
    }

    #[test]
    fn test_classify_other_failures_as_delivery() {
        assert!(matches!(
            classify_text("permanent error (550): mailbox unavailable"),
            TransportError::Delivery(_)
        ));
    }

    #[test]
    fn test_smtp_code_matching_respects_boundaries() {
        assert!(contains_smtp_code("permanent error (535)", "535"));
        assert!(!contains_smtp_code("user5350@example.com", "535"));
    }

    #[test]
    fn test_plain_message_builds() -> TestResult {
        let message = build_message(&outbound(None, Vec::new()))?;
        let formatted = String::from_utf8(message.formatted())?;

        assert!(formatted.contains("hello"));
        assert!(formatted.contains("Subject: greetings"));

        Ok(())
    }

    #[test]
    fn test_html_message_builds_as_alternative() -> TestResult {
        let message = build_message(&outbound(Some("<p>hello</p>"), Vec::new()))?;
        let formatted = String::from_utf8(message.formatted())?;

        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("<p>hello</p>"));

        Ok(())
    }

    #[test]
    fn test_missing_attachment_is_skipped() -> TestResult {
        let mut file = NamedTempFile::new()?;
        write!(file, "attachment payload")?;

        let attachments = vec![
            file.path().to_path_buf(),
            PathBuf::from("/nonexistent/report.pdf"),
        ];

        let parts = load_attachments(&attachments);
        assert_eq!(parts.len(), 1);

        let message = build_message(&outbound(None, attachments))?;
        let formatted = String::from_utf8(message.formatted())?;

        assert!(formatted.contains("multipart/mixed"));
        assert!(!formatted.contains("report.pdf"));

        Ok(())
    }
}
