//! Centralized configuration (environment variables + defaults).

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM_NAME: &str = "Portfolio Contact";
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 5;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

/// Runtime mode. Anything but `production` is treated as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (port 465); otherwise STARTTLS is required.
    pub secure: bool,
    /// `None` when either `SMTP_USER` or `SMTP_PASS` is missing.
    pub credentials: Option<SmtpCredentials>,
}

#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub smtp: SmtpConfig,
    pub from_name: String,
    /// Destination inbox; falls back to the SMTP user.
    pub contact_email: Option<String>,
    pub allowed_origins: Vec<String>,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    pub hosted: Option<HostedConfig>,
}

impl Config {
    /// Reads the process environment (after loading `.env`, if any).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let smtp_port = parse_or(get("SMTP_PORT"), "SMTP_PORT", DEFAULT_SMTP_PORT)?;
        let credentials = match (get("SMTP_USER"), get("SMTP_PASS")) {
            (Some(user), Some(pass)) => Some(SmtpCredentials { user, pass }),
            _ => None,
        };

        let hosted = match (
            get("EMAILJS_SERVICE_ID"),
            get("EMAILJS_TEMPLATE_ID"),
            get("EMAILJS_PUBLIC_KEY"),
        ) {
            (Some(service_id), Some(template_id), Some(public_key)) => Some(HostedConfig {
                service_id,
                template_id,
                public_key,
                access_token: get("EMAILJS_ACCESS_TOKEN"),
            }),
            _ => None,
        };

        Ok(Self {
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            environment: Environment::parse(&get("APP_ENV").unwrap_or_default()),
            smtp: SmtpConfig {
                host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: smtp_port,
                secure: smtp_port == 465,
                credentials,
            },
            from_name: get("MAIL_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            contact_email: get("CONTACT_EMAIL"),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_max: parse_or(get("RATE_LIMIT_MAX"), "RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX)?
                .max(1),
            rate_limit_window: Duration::from_secs(
                parse_or(
                    get("RATE_LIMIT_WINDOW_SECS"),
                    "RATE_LIMIT_WINDOW_SECS",
                    DEFAULT_RATE_LIMIT_WINDOW_SECS,
                )?
                .max(1),
            ),
            hosted,
        })
    }

    /// Where contact messages are delivered.
    pub fn recipient(&self) -> Option<String> {
        self.contact_email
            .clone()
            .or_else(|| self.smtp.credentials.as_ref().map(|c| c.user.clone()))
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .parse::<T>()
            .with_context(|| format!("{} must be a valid number (got {:?})", key, v)),
        None => Ok(default),
    }
}
