//! Error types for the mail transport

use thiserror::Error;

/// Failures surfaced by the mail transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The relay rejected the session credentials
    #[error("relay authentication failed: {0}")]
    Authentication(String),

    /// The relay could not be reached
    #[error("relay connection failed: {0}")]
    Connection(String),

    /// The relay was reachable but the message was not accepted
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl TransportError {
    /// Whether the failure invalidates the whole transport session rather
    /// than only the recipient it surfaced on.
    pub fn is_session_fault(&self) -> bool {
        matches!(self, Self::Authentication(_) | Self::Connection(_))
    }
}
