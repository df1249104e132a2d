// SMTP delivery via lettre. One instance lives for the whole process; lettre
// opens a fresh connection for every verify/send since pooling is disabled.

use async_trait::async_trait;
use lettre::address::Address;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::Error as SmtpError;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::domain::delivery::{DeliveryReceipt, MailTransport, TransportError, TransportErrorKind};
use crate::domain::message::{NamedAddress, OutboundEmail};
use crate::infra::config::{Environment, SmtpConfig};

/// SMTP reply codes that mean the server refused our credentials.
const AUTH_FAILURE_CODES: &[&str] = &["530", "534", "535"];

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl SmtpMailer {
    /// Builds the transport. Returns `Ok(None)` when credentials are missing,
    /// so the relay can fail closed per request instead of at startup.
    ///
    /// Outside production, invalid TLS certificates are accepted.
    pub fn from_config(config: &SmtpConfig, environment: Environment) -> anyhow::Result<Option<Self>> {
        let Some(credentials) = config.credentials.as_ref() else {
            return Ok(None);
        };

        let tls_parameters = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(!environment.is_production())
            .build()?;
        let tls = if config.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Required(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.clone())
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.pass.clone(),
            ))
            .build();

        info!(
            host = %config.host,
            port = config.port,
            secure = config.secure,
            "SMTP transport configured"
        );

        Ok(Some(Self {
            transport,
            host: config.host.clone(),
            port: config.port,
        }))
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), TransportError> {
        debug!(endpoint = %self.endpoint(), "verifying SMTP connection");
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::new(
                TransportErrorKind::Connection,
                format!("SMTP server {} did not accept the connection", self.endpoint()),
            )),
            Err(e) => Err(classify(&e)),
        }
    }

    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, TransportError> {
        let message = build_message(email)?;
        let response = self.transport.send(message).await.map_err(|e| classify(&e))?;

        let reply = format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );
        Ok(DeliveryReceipt {
            message_id: email.message_id.clone(),
            response: Some(reply),
        })
    }
}

fn build_message(email: &OutboundEmail) -> Result<Message, TransportError> {
    Message::builder()
        .message_id(Some(email.message_id.clone()))
        .from(mailbox(&email.from)?)
        .reply_to(mailbox(&email.reply_to)?)
        .to(mailbox(&email.to)?)
        .subject(email.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|e| TransportError::new(TransportErrorKind::Other, format!("failed to build message: {}", e)))
}

fn mailbox(address: &NamedAddress) -> Result<Mailbox, TransportError> {
    let parsed: Address = address.address.parse().map_err(|e| {
        TransportError::new(
            TransportErrorKind::Other,
            format!("invalid address {:?}: {}", address.address, e),
        )
    })?;
    Ok(Mailbox::new(address.name.clone(), parsed))
}

/// Structured signals first (timeout flag, reply code, TLS, a server that hung
/// up or answered without a reply code), then the text.
fn classify(err: &SmtpError) -> TransportError {
    let detail = err.to_string();
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err
        .status()
        .is_some_and(|code| AUTH_FAILURE_CODES.contains(&code.to_string().as_str()))
    {
        TransportErrorKind::Authentication
    } else if err.is_tls() || err.is_response() {
        TransportErrorKind::Connection
    } else {
        TransportErrorKind::from_text(&detail)
    };
    TransportError::new(kind, detail)
}
