use crate::app::contact_service::ContactService;
use crate::domain::submission::FieldError;
use crate::infra::config::Environment;
use crate::transport::http::rate_limit::RateLimiter;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "portfolio-contact-api";

#[derive(Clone)]
pub struct AppState {
    pub contact_service: Arc<ContactService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub environment: Environment,
}

/// Body of `POST /api/send-email`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Internal error text; only present outside production.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SendEmailResponse {
    pub fn sent(message_id: String) -> Self {
        Self {
            success: true,
            message: Some("Email sent successfully".to_string()),
            message_id: Some(message_id),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub environment: String,
    pub service: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct NotFoundResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

pub fn json_400(err: JsonRejection) -> (StatusCode, Json<SendEmailResponse>) {
    let status = match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(SendEmailResponse::failure(format!("Invalid JSON body: {}", err.body_text()))),
    )
}
