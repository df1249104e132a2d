// src/bin/api_server.rs

use portfolio_contact_relay::transport;
use portfolio_contact_relay::transport::http::{AppState, RateLimiter};
use portfolio_contact_relay::{Config, ContactService, MailTransport, SmtpMailer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(
        environment = config.environment.as_str(),
        smtp_host = %config.smtp.host,
        smtp_port = config.smtp.port,
        secure = config.smtp.secure,
        has_credentials = config.smtp.credentials.is_some(),
        "Loaded configuration"
    );

    // --- Mail transport (created once, shared by every request) ---
    let mailer: Option<Arc<dyn MailTransport>> = SmtpMailer::from_config(&config.smtp, config.environment)?
        .map(|mailer| Arc::new(mailer) as Arc<dyn MailTransport>);
    match &mailer {
        Some(mailer) => {
            // Startup check is informational only; every request verifies again.
            let mailer = mailer.clone();
            tokio::spawn(async move {
                match mailer.verify().await {
                    Ok(()) => info!("SMTP server is ready to take our messages"),
                    Err(e) => error!(kind = ?e.kind, "SMTP connection error: {}", e),
                }
            });
        }
        None => warn!("SMTP_USER/SMTP_PASS not set; /api/send-email will answer 500"),
    }

    let contact_service = Arc::new(ContactService::from_config(&config, mailer));

    // --- Rate limiter ---
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit_max, config.rate_limit_window));
    rate_limiter.clone().start_background_sweep();

    let app_state = AppState {
        contact_service: contact_service.clone(),
        rate_limiter: rate_limiter.clone(),
        environment: config.environment,
    };

    let app = transport::http::with_http_layers(
        transport::http::create_router(app_state)
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi())),
        config.environment,
        &config.allowed_origins,
    );

    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(
        "Server running in {} mode on port {}",
        config.environment.as_str(),
        config.port
    );
    info!("Health check: http://localhost:{}/api/health", config.port);
    info!("Swagger UI available at http://localhost:{}/swagger-ui", config.port);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    rate_limiter.shutdown();
    drop(contact_service);
    info!("Mail transport released; process terminated");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("SIGTERM received, shutting down gracefully");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
