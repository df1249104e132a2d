//! Contract between the relay and whatever actually delivers mail.

use async_trait::async_trait;

use crate::domain::message::OutboundEmail;

pub mod error;

pub use error::{TransportError, TransportErrorKind};

/// What the transport reports back once it accepted a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: String,
    /// Raw provider reply, if any (e.g. `250 2.0.0 OK`).
    pub response: Option<String>,
}

/// Mail transport used by the relay.
///
/// Built once at startup and shared by every request; implementations must
/// not keep per-request state.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Checks that the transport is reachable and accepts our credentials.
    async fn verify(&self) -> Result<(), TransportError>;

    /// Hands one message to the transport.
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, TransportError>;
}
