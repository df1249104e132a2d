//! The contact-form submission entered by a visitor, and its validated form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod validation;

pub use validation::{validate, validate_with_subject};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 2000;
pub const SUBJECT_MAX_CHARS: usize = 200;

/// Raw fields as typed by the visitor.
///
/// Missing JSON fields deserialize to empty strings so that they surface as
/// validation failures instead of body-parsing failures.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl ContactSubmission {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.message.is_empty()
            && self.subject.as_deref().map_or(true, str::is_empty)
    }
}

/// A submission whose fields passed validation. Values are trimmed, and the
/// email is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: Option<String>,
}

/// One failing field, reported back to the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct FieldError {
    /// Name of the offending field (`name`, `email`, `message`, `subject`).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
    /// The value as received.
    pub value: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value: value.to_string(),
        }
    }
}

/// Hides the local part of an address for log lines (`ja***@example.com`).
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let shown: String = local.chars().take(2).collect();
            format!("{}***@{}", shown, domain)
        }
        None => "***".to_string(),
    }
}
