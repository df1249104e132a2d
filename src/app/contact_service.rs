//! The contact relay.
//!
//! Turns one `ContactSubmission` into one outbound email:
//! 1.  Fails closed when no transport/sender identity is configured.
//! 2.  Validates the submitted fields.
//! 3.  Composes the message (reply-to points at the submitter).
//! 4.  Runs a pre-flight `verify()` against the transport.
//! 5.  Sends, returning the provider receipt.
//!
//! Nothing is kept between calls.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::delivery::{DeliveryReceipt, MailTransport, TransportError};
use crate::domain::message::{compose, SenderProfile};
use crate::domain::submission::{mask_email, validate, ContactSubmission, FieldError};
use crate::infra::config::Config;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Server configuration error")]
    Configuration,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub struct ContactService {
    transport: Option<Arc<dyn MailTransport>>,
    sender: Option<SenderProfile>,
}

impl ContactService {
    pub fn new(transport: Option<Arc<dyn MailTransport>>, sender: Option<SenderProfile>) -> Self {
        Self { transport, sender }
    }

    /// Derives the sender identity from the SMTP credentials; without them the
    /// service is left unconfigured.
    pub fn from_config(config: &Config, transport: Option<Arc<dyn MailTransport>>) -> Self {
        let sender = match (config.smtp.credentials.as_ref(), config.recipient()) {
            (Some(credentials), Some(recipient)) => Some(SenderProfile {
                display_name: config.from_name.clone(),
                address: credentials.user.clone(),
                recipient,
            }),
            _ => None,
        };
        Self::new(transport, sender)
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some() && self.sender.is_some()
    }

    pub async fn relay(&self, submission: &ContactSubmission) -> Result<DeliveryReceipt, RelayError> {
        let (Some(transport), Some(sender)) = (self.transport.as_ref(), self.sender.as_ref()) else {
            error!("Missing SMTP credentials; refusing to relay");
            return Err(RelayError::Configuration);
        };

        let valid = validate(submission).map_err(|errors| {
            info!(failures = errors.len(), "Submission rejected by validation");
            RelayError::Validation(errors)
        })?;

        let email = compose(&valid, sender);
        info!(
            from = %mask_email(&valid.email),
            message_len = valid.message.chars().count(),
            "Relaying contact message"
        );

        if let Err(e) = transport.verify().await {
            warn!(kind = ?e.kind, "Transport pre-flight verification failed: {}", e);
            return Err(e.into());
        }

        match transport.send(&email).await {
            Ok(receipt) => {
                info!(
                    message_id = %receipt.message_id,
                    response = receipt.response.as_deref().unwrap_or("-"),
                    "Email sent successfully"
                );
                Ok(receipt)
            }
            Err(e) => {
                error!(kind = ?e.kind, "Error sending email: {}", e);
                Err(e.into())
            }
        }
    }
}
