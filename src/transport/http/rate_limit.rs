//! Fixed-window, per-IP request limiter for the send endpoint.
//!
//! Each source address gets `max_requests` per `window`, counted from its first
//! request in that window. A background task drops expired windows so the
//! table does not grow without bound.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::sync::{Mutex, Notify};
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

use crate::transport::http::types::SendEmailResponse;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
    shutdown: Arc<Notify>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            windows: Mutex::new(HashMap::new()),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records one request from `ip` and decides whether it may pass.
    pub async fn check(&self, ip: IpAddr) -> Decision {
        self.check_at(ip, Instant::now()).await
    }

    async fn check_at(&self, ip: IpAddr, now: Instant) -> Decision {
        let mut windows = self.windows.lock().await;
        let entry = windows.entry(ip).or_insert(Window { started: now, count: 0 });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window { started: now, count: 0 };
        }

        if entry.count >= self.max_requests {
            let retry_after = self.window.saturating_sub(now.duration_since(entry.started));
            return Decision::Limited { retry_after };
        }

        entry.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Drops windows that have expired. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Instant::now()).await
    }

    async fn sweep_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < self.window);
        before - windows.len()
    }

    pub async fn tracked_sources(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// Periodically sweeps expired windows until [`RateLimiter::shutdown`] is called.
    pub fn start_background_sweep(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut timer = interval(self.window);
            let shutdown = self.shutdown.clone();

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let removed = self.sweep().await;
                        if removed > 0 {
                            debug!(removed, "Swept expired rate-limit windows");
                        }
                    }
                    _ = shutdown.notified() => {
                        info!("Rate limiter sweep task shutting down");
                        break;
                    }
                }
            }
        });
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    pub fn limited_message(&self) -> String {
        let secs = self.window.as_secs();
        let span = if secs >= 60 && secs % 60 == 0 {
            format!("{} minutes", secs / 60)
        } else {
            format!("{} seconds", secs)
        };
        format!("Too many requests from this IP, please try again after {}", span)
    }
}

/// Middleware guarding `POST /api/send-email`.
///
/// Requests without connection info (in-process tests, unusual servers) share a
/// single bucket.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match limiter.check(ip).await {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            warn!(%ip, "Rate limit exceeded");
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(SendEmailResponse::failure(limiter.limited_message())),
            )
                .into_response();
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after.as_secs().max(1)),
            );
            response
        }
    }
}
