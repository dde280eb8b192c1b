//! The delivery pipeline

use std::fmt;

use tracing::{info, warn};

use crate::domain::{
    communication::{email_address::EmailAddress, mailer::Mailer, message::OutboundEmail},
    dispatch::{
        content::ResolvedContent,
        report::{DeliveryOutcome, DeliveryReport},
        request::DeliveryRequest,
    },
};

/// How a run reacts to relay-level session faults
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// A rejected credential or a dropped connection aborts the remaining
    /// batch; already-attempted outcomes are kept (direct invocation).
    AbortOnSessionFault,

    /// Every transport failure is recorded uniformly and the run continues
    /// through the full recipient list (service).
    AttemptAll,
}

/// Sequential per-recipient delivery over a [`Mailer`]
pub struct DeliveryPipeline<M: Mailer> {
    mailer: M,
    policy: FailurePolicy,
}

impl<M: Mailer> DeliveryPipeline<M> {
    /// Create a new pipeline
    pub fn new(mailer: M, policy: FailurePolicy) -> Self {
        Self { mailer, policy }
    }

    /// Deliver the request to each recipient in submission order.
    ///
    /// One recipient's failure never aborts delivery to subsequent
    /// recipients, with a single exception: under
    /// [`FailurePolicy::AbortOnSessionFault`] a session fault ends the run
    /// after its own outcome is recorded.
    pub async fn deliver(
        &self,
        request: &DeliveryRequest,
        content: &ResolvedContent,
    ) -> DeliveryReport {
        let mut outcomes = Vec::with_capacity(request.recipients().len());
        let mut fault = None;

        for recipient in request.recipients() {
            let to = match EmailAddress::new(recipient) {
                Ok(to) => to,
                Err(err) => {
                    warn!(%recipient, %err, "skipping recipient with unusable address");
                    outcomes.push(DeliveryOutcome::failed(recipient, err.to_string()));
                    continue;
                }
            };

            let email = OutboundEmail {
                from: request.sender().clone(),
                to,
                subject: request.subject().to_string(),
                text_body: content.text.clone(),
                html_body: content.html.clone(),
                attachments: request.attachments().to_vec(),
            };

            match self.mailer.send(&email).await {
                Ok(()) => {
                    info!(%recipient, "message delivered");
                    outcomes.push(DeliveryOutcome::delivered(recipient));
                }
                Err(err) => {
                    warn!(%recipient, %err, "delivery failed");
                    outcomes.push(DeliveryOutcome::failed(recipient, err.to_string()));

                    if self.policy == FailurePolicy::AbortOnSessionFault && err.is_session_fault()
                    {
                        fault = Some(err);
                        break;
                    }
                }
            }
        }

        DeliveryReport::new(outcomes, fault)
    }
}

impl<M: Mailer> fmt::Debug for DeliveryPipeline<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryPipeline")
            .field("policy", &self.policy)
            .field("mailer", &"Mailer")
            .finish()
    }
}
