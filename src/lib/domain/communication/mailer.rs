//! Mail transport service module

use std::sync::Arc;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{errors::TransportError, message::OutboundEmail};

/// Mail transport service
///
/// One invocation opens an authenticated session to the relay and delivers
/// the message to its single recipient.
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `email` - The [`OutboundEmail`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] indicating success or a classified [`TransportError`].
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}

#[async_trait]
impl<M: Mailer> Mailer for Arc<M> {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        (**self).send(email).await
    }
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
    }
}
