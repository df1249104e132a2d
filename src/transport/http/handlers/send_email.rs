use crate::app::contact_service::RelayError;
use crate::domain::delivery::TransportErrorKind;
use crate::domain::submission::ContactSubmission;
use crate::infra::config::Environment;
use crate::transport::http::types::{json_400, AppState, SendEmailRequest, SendEmailResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/send-email",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email accepted by the transport", body = SendEmailResponse),
        (status = 400, description = "Validation failed or invalid JSON body", body = SendEmailResponse),
        (status = 401, description = "Transport rejected the credentials", body = SendEmailResponse),
        (status = 413, description = "Body larger than 10 KiB", body = SendEmailResponse),
        (status = 429, description = "Rate limit exceeded", body = SendEmailResponse),
        (status = 500, description = "Missing configuration or unclassified failure", body = SendEmailResponse),
        (status = 503, description = "Could not connect to the transport", body = SendEmailResponse),
        (status = 504, description = "Transport timed out", body = SendEmailResponse)
    )
)]
pub async fn send_email_handler(
    State(state): State<AppState>,
    request: Result<Json<SendEmailRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e).into_response(),
    };

    let submission = ContactSubmission::new(request.name, request.email, request.message);
    match state.contact_service.relay(&submission).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(SendEmailResponse::sent(receipt.message_id)),
        )
            .into_response(),
        Err(e) => relay_error_response(e, state.environment).into_response(),
    }
}

pub fn relay_error_response(
    err: RelayError,
    environment: Environment,
) -> (StatusCode, Json<SendEmailResponse>) {
    match err {
        RelayError::Configuration => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SendEmailResponse::failure(RelayError::Configuration.to_string())),
        ),
        RelayError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(SendEmailResponse {
                errors: Some(errors),
                ..SendEmailResponse::failure("Validation failed")
            }),
        ),
        RelayError::Transport(e) => {
            let status = match e.kind {
                TransportErrorKind::Authentication => StatusCode::UNAUTHORIZED,
                TransportErrorKind::Connection => StatusCode::SERVICE_UNAVAILABLE,
                TransportErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                TransportErrorKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let details = (!environment.is_production()).then(|| e.detail.clone());
            (
                status,
                Json(SendEmailResponse {
                    details,
                    ..SendEmailResponse::failure(e.kind.user_message())
                }),
            )
        }
    }
}
