// Direct delivery through a hosted email API (EmailJS REST shape). The hosted
// service owns templating and transport; we only marshal the fields.

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use tracing::debug;

use crate::client::{Delivered, DeliveryChannel, DeliveryError};
use crate::domain::submission::ValidSubmission;
use crate::infra::config::HostedConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.emailjs.com";
const SEND_PATH: &str = "/api/v1.0/email/send";

#[derive(Serialize, Debug)]
struct TemplateParams<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    time: String,
}

#[derive(Serialize, Debug)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

pub struct HostedChannel {
    client: reqwest::Client,
    base_url: String,
    config: HostedConfig,
}

impl HostedChannel {
    pub fn new(config: HostedConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(config: HostedConfig, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }
}

#[async_trait]
impl DeliveryChannel for HostedChannel {
    fn name(&self) -> &'static str {
        "hosted"
    }

    async fn deliver(&self, submission: &ValidSubmission) -> Result<Delivered, DeliveryError> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.access_token.as_deref(),
            template_params: TemplateParams {
                name: &submission.name,
                email: &submission.email,
                subject: submission.subject.as_deref().unwrap_or_default(),
                message: &submission.message,
                time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            },
        };

        debug!(service_id = %self.config.service_id, "Sending through hosted email API");
        let response = self
            .client
            .post(format!("{}{}", self.base_url, SEND_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Unavailable { detail: e.to_string() })?;

        let status = response.status();
        if status.is_success() {
            return Ok(Delivered { message_id: None });
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Unavailable {
            detail: format!("hosted API answered {}: {}", status, body.trim()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config() -> HostedConfig {
        HostedConfig {
            service_id: "service_abc".to_string(),
            template_id: "template_xyz".to_string(),
            public_key: "public-key".to_string(),
            access_token: None,
        }
    }

    fn submission() -> ValidSubmission {
        ValidSubmission {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            message: "Hello, I would like to talk.".to_string(),
            subject: Some("Project".to_string()),
        }
    }

    #[tokio::test]
    async fn marshals_fields_and_timestamp() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SEND_PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({
                    "service_id": "service_abc",
                    "template_id": "template_xyz",
                    "user_id": "public-key",
                    "template_params": {
                        "name": "Jane Doe",
                        "email": "jane@example.com",
                        "subject": "Project",
                        "message": "Hello, I would like to talk."
                    }
                })),
                Matcher::Regex(r#""time":"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}""#.to_string()),
            ]))
            .with_status(200)
            .with_body("OK")
            .create_async()
            .await;

        let channel = HostedChannel::with_base_url(config(), &server.url());
        channel.deliver(&submission()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_error_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", SEND_PATH)
            .with_status(400)
            .with_body("The Public Key is invalid")
            .create_async()
            .await;

        let channel = HostedChannel::with_base_url(config(), &server.url());
        match channel.deliver(&submission()).await.unwrap_err() {
            DeliveryError::Unavailable { detail } => assert!(detail.contains("Public Key is invalid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
