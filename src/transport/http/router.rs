use crate::domain::submission::FieldError;
use crate::infra::config::Environment;
use crate::transport::http::handlers::{common, health, send_email};
use crate::transport::http::rate_limit::rate_limit;
use crate::transport::http::types::{
    AppState, HealthResponse, NotFoundResponse, SendEmailRequest, SendEmailResponse,
};
use axum::extract::DefaultBodyLimit;
use axum::http::header::{
    AUTHORIZATION, CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Request bodies for the send endpoint are capped at 10 KiB.
pub const MAX_BODY_BYTES: usize = 10 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        send_email::send_email_handler
    ),
    components(schemas(
        SendEmailRequest,
        SendEmailResponse,
        FieldError,
        HealthResponse,
        NotFoundResponse
    ))
)]
pub struct ApiDoc;

/// Routes only; see [`with_http_layers`] for CORS, security headers and tracing.
pub fn create_router(app_state: AppState) -> Router {
    let limiter = app_state.rate_limiter.clone();
    Router::new()
        .route("/api/health", get(health::healthcheck_handler))
        .route(
            "/api/send-email",
            post(send_email::send_email_handler)
                .route_layer(middleware::from_fn_with_state(limiter, rate_limit))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .fallback(common::not_found_handler)
        .with_state(app_state)
}

pub fn with_http_layers(router: Router, environment: Environment, allowed_origins: &[String]) -> Router {
    router
        .layer(cors_layer(environment, allowed_origins))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Any origin in development; only `allowed_origins` in production.
pub fn cors_layer(environment: Environment, allowed_origins: &[String]) -> CorsLayer {
    let origin = if environment.is_production() {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    } else {
        AllowOrigin::mirror_request()
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
