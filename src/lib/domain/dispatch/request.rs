//! Delivery request

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::communication::email_address::EmailAddress;

/// Placeholder subject used when the caller provides none
pub const DEFAULT_SUBJECT: &str = "(no subject)";

/// An error that can occur when building a delivery request
#[derive(Debug, Error)]
pub enum RequestError {
    /// No usable recipient remained after trimming
    #[error("Recipient list is empty or incorrectly formatted")]
    NoRecipients,
}

/// A validated batch delivery request
#[derive(Clone, Debug)]
pub struct DeliveryRequest {
    sender: EmailAddress,
    recipients: Vec<String>,
    subject: String,
    attachments: Vec<PathBuf>,
}

impl DeliveryRequest {
    /// Build a request, trimming recipient entries and dropping empty ones.
    ///
    /// # Errors
    /// [`RequestError::NoRecipients`] when no non-empty recipient remains.
    pub fn new(
        sender: EmailAddress,
        recipients: Vec<String>,
        subject: Option<String>,
        attachments: Vec<PathBuf>,
    ) -> Result<Self, RequestError> {
        let recipients: Vec<String> = recipients
            .into_iter()
            .map(|recipient| recipient.trim().to_string())
            .filter(|recipient| !recipient.is_empty())
            .collect();

        if recipients.is_empty() {
            return Err(RequestError::NoRecipients);
        }

        Ok(Self {
            sender,
            recipients,
            subject: subject.unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            attachments,
        })
    }

    /// The sender address
    pub fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    /// The recipient addresses, in submission order
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// The message subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Paths of files to attach to every message
    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }
}
