//! Outbound email message

use std::path::PathBuf;

use crate::domain::communication::email_address::EmailAddress;

/// A single-recipient email handed to the transport
#[derive(Clone, Debug)]
pub struct OutboundEmail {
    /// The sender of the email
    pub from: EmailAddress,

    /// The recipient of the email
    pub to: EmailAddress,

    /// The subject of the email
    pub subject: String,

    /// The plain text body of the email
    pub text_body: String,

    /// The HTML body of the email
    pub html_body: Option<String>,

    /// Paths of files to attach
    pub attachments: Vec<PathBuf>,
}
