//! Client-side submission: a form that drives one delivery at a time through a
//! swappable [`DeliveryChannel`].
//!
//! Two channels exist: [`RelayChannel`] posts to the self-hosted relay, and
//! [`crate::infra::hosted::HostedChannel`] calls the hosted email API directly.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::submission::ValidSubmission;

pub mod form;
pub mod relay;

pub use form::{ContactForm, FormField, Notification, NotificationKind, SubmitOutcome};
pub use relay::RelayChannel;

pub const GENERIC_FAILURE: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub message_id: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The collaborator answered and refused; `reason` is safe to show.
    #[error("{reason}")]
    Rejected { reason: String },

    /// Network failure or an unexpected answer.
    #[error("delivery unavailable: {detail}")]
    Unavailable { detail: String },
}

impl DeliveryError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { reason } => reason,
            Self::Unavailable { .. } => GENERIC_FAILURE,
        }
    }
}

#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    async fn deliver(&self, submission: &ValidSubmission) -> Result<Delivered, DeliveryError>;
}
