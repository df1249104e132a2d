//! Shared fixtures: an in-process relay on an ephemeral port backed by a
//! recording fake transport.

#![allow(dead_code)]

use async_trait::async_trait;
use portfolio_contact_relay::domain::message::{OutboundEmail, SenderProfile};
use portfolio_contact_relay::transport;
use portfolio_contact_relay::transport::http::{AppState, RateLimiter};
use portfolio_contact_relay::{
    ContactService, DeliveryReceipt, Environment, MailTransport, TransportError,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
pub struct FakeTransport {
    pub verifies: AtomicUsize,
    pub sends: AtomicUsize,
    /// When set, `send` fails with this text (classified by keyword).
    pub failure: Option<String>,
}

impl FakeTransport {
    pub fn failing(text: &str) -> Self {
        Self {
            failure: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for FakeTransport {
    async fn verify(&self) -> Result<(), TransportError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, TransportError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(text) => Err(TransportError::from_text(text.clone())),
            None => Ok(DeliveryReceipt {
                message_id: email.message_id.clone(),
                response: Some("250 2.0.0 OK".to_string()),
            }),
        }
    }
}

pub struct TestApp {
    pub base_url: String,
    pub transport: Arc<FakeTransport>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }
}

pub fn sender() -> SenderProfile {
    SenderProfile {
        display_name: "Portfolio Contact".to_string(),
        address: "relay@example.org".to_string(),
        recipient: "owner@example.org".to_string(),
    }
}

/// Starts the router. `configured = false` simulates missing SMTP credentials.
pub async fn spawn_app(
    fake: FakeTransport,
    configured: bool,
    environment: Environment,
) -> TestApp {
    let fake = Arc::new(fake);
    let contact_service = if configured {
        ContactService::new(Some(fake.clone() as Arc<dyn MailTransport>), Some(sender()))
    } else {
        ContactService::new(None, None)
    };

    let app_state = AppState {
        contact_service: Arc::new(contact_service),
        rate_limiter: Arc::new(RateLimiter::new(5, Duration::from_secs(15 * 60))),
        environment,
    };
    let router = transport::http::with_http_layers(
        transport::http::create_router(app_state),
        environment,
        &[],
    );

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let port = listener.local_addr().expect("no local addr").port();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        transport: fake,
        client: reqwest::Client::new(),
    }
}
