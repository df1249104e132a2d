//! Outbound email built from a validated submission.

pub mod composer;

pub use composer::{compose, escape_html};

/// A named address, rendered as `"Name" <address>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAddress {
    pub name: Option<String>,
    pub address: String,
}

impl NamedAddress {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }

    pub fn bare(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }
}

impl std::fmt::Display for NamedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "\"{}\" <{}>", name, self.address),
            None => write!(f, "<{}>", self.address),
        }
    }
}

/// Who the relay sends as, and where messages land.
#[derive(Debug, Clone)]
pub struct SenderProfile {
    /// Display name on the `From` header.
    pub display_name: String,
    /// Authenticated transport identity; used as the `From` address.
    pub address: String,
    /// Destination inbox.
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub message_id: String,
    pub from: NamedAddress,
    pub to: NamedAddress,
    pub reply_to: NamedAddress,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}
