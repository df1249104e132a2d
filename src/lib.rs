pub mod app;
pub mod client;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::contact_service::{ContactService, RelayError};
pub use client::{ContactForm, DeliveryChannel, RelayChannel};
pub use domain::delivery::{DeliveryReceipt, MailTransport, TransportError, TransportErrorKind};
pub use domain::submission::{ContactSubmission, FieldError, ValidSubmission};
pub use infra::config::{Config, Environment};
pub use infra::hosted::HostedChannel;
pub use infra::smtp::SmtpMailer;
