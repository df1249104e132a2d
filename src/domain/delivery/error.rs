use thiserror::Error;

/// Coarse category of a transport failure, as surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Authentication,
    Connection,
    Timeout,
    Other,
}

impl TransportErrorKind {
    /// Keyword fallback for transports that give no structured code.
    ///
    /// Order matters: "Connection timed out" is a connectivity failure.
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("authentication") || text.contains("auth") {
            Self::Authentication
        } else if text.contains("connection") || text.contains("connect") {
            Self::Connection
        } else if text.contains("timeout") {
            Self::Timeout
        } else {
            Self::Other
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Authentication => "Email authentication failed. Please check your credentials.",
            Self::Connection => "Failed to connect to email server. Please try again later.",
            Self::Timeout => "Email sending timed out. Please try again.",
            Self::Other => "Failed to send email",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Classifies purely from the error text.
    pub fn from_text(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind: TransportErrorKind::from_text(&detail),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_classification() {
        use TransportErrorKind::*;
        assert_eq!(TransportErrorKind::from_text("Invalid login: 535 Authentication failed"), Authentication);
        assert_eq!(TransportErrorKind::from_text("auth rejected"), Authentication);
        assert_eq!(TransportErrorKind::from_text("Could not connect to host"), Connection);
        assert_eq!(TransportErrorKind::from_text("Connection timed out"), Connection);
        assert_eq!(TransportErrorKind::from_text("Greeting never received: timeout"), Timeout);
        assert_eq!(TransportErrorKind::from_text("Mailbox unavailable"), Other);
    }
}
