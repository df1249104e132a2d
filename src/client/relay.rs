use async_trait::async_trait;
use serde_json::json;

use super::{Delivered, DeliveryChannel, DeliveryError};
use crate::domain::submission::ValidSubmission;
use crate::transport::http::types::SendEmailResponse;

/// Posts submissions to a self-hosted relay (`POST <base>/api/send-email`).
pub struct RelayChannel {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayChannel {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/send-email", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DeliveryChannel for RelayChannel {
    fn name(&self) -> &'static str {
        "relay"
    }

    async fn deliver(&self, submission: &ValidSubmission) -> Result<Delivered, DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "name": submission.name,
                "email": submission.email,
                "message": submission.message,
            }))
            .send()
            .await
            .map_err(|e| DeliveryError::Unavailable { detail: e.to_string() })?;

        let status = response.status();
        let body: Option<SendEmailResponse> = response.json().await.ok();

        match body {
            Some(body) if status.is_success() && body.success => Ok(Delivered {
                message_id: body.message_id,
            }),
            Some(body) => Err(DeliveryError::Rejected {
                reason: body
                    .error
                    .unwrap_or_else(|| "Failed to send message".to_string()),
            }),
            None => Err(DeliveryError::Unavailable {
                detail: format!("relay answered {} without a JSON body", status),
            }),
        }
    }
}
