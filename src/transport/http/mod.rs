pub mod rate_limit;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod health;
    pub mod send_email;
}

pub use rate_limit::RateLimiter;
pub use router::{create_router, with_http_layers, ApiDoc};
pub use types::AppState;
