use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use super::DeliveryChannel;
use crate::domain::submission::{validate_with_subject, ContactSubmission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast-style message shown to the visitor after a submit settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn success() -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success!".to_string(),
            description: "Your message has been sent successfully.".to_string(),
        }
    }

    fn error(description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing was sent.
    Ignored,
    Completed(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

pub struct ContactForm {
    fields: Mutex<ContactSubmission>,
    submitting: AtomicBool,
    channel: Arc<dyn DeliveryChannel>,
}

/// Re-enables the form when dropped, whatever way the submit ended.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ContactForm {
    pub fn new(channel: Arc<dyn DeliveryChannel>) -> Self {
        Self {
            fields: Mutex::new(ContactSubmission::default()),
            submitting: AtomicBool::new(false),
            channel,
        }
    }

    pub fn fields(&self) -> ContactSubmission {
        self.lock_fields().clone()
    }

    pub fn fill(&self, submission: ContactSubmission) {
        *self.lock_fields() = submission;
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let mut fields = self.lock_fields();
        match field {
            FormField::Name => fields.name = value,
            FormField::Email => fields.email = value,
            FormField::Subject => fields.subject = Some(value),
            FormField::Message => fields.message = value,
        }
    }

    /// Whether the submit control is currently disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Sends the current fields once. Never retries.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_guard) = self.begin() else {
            return SubmitOutcome::Ignored;
        };

        let snapshot = self.fields();
        let valid = match validate_with_subject(&snapshot) {
            Ok(v) => v,
            Err(errors) => {
                let reasons: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                return SubmitOutcome::Completed(Notification::error(reasons.join("; ")));
            }
        };

        match self.channel.deliver(&valid).await {
            Ok(delivered) => {
                info!(
                    channel = self.channel.name(),
                    message_id = ?delivered.message_id,
                    "Contact message delivered"
                );
                // Only clear if nobody edited the form while we were sending.
                let mut fields = self.lock_fields();
                if *fields == snapshot {
                    *fields = ContactSubmission::default();
                }
                SubmitOutcome::Completed(Notification::success())
            }
            Err(e) => {
                warn!(channel = self.channel.name(), "Failed to send contact message: {}", e);
                SubmitOutcome::Completed(Notification::error(e.user_message()))
            }
        }
    }

    fn begin(&self) -> Option<SubmittingGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmittingGuard(&self.submitting))
    }

    fn lock_fields(&self) -> MutexGuard<'_, ContactSubmission> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Delivered, DeliveryError, GENERIC_FAILURE};
    use crate::domain::submission::ValidSubmission;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct Scripted {
        calls: AtomicUsize,
        result: Result<Delivered, DeliveryError>,
        release: Option<Arc<Notify>>,
    }

    impl Scripted {
        fn new(result: Result<Delivered, DeliveryError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result,
                release: None,
            }
        }
    }

    #[async_trait]
    impl DeliveryChannel for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn deliver(&self, _submission: &ValidSubmission) -> Result<Delivered, DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(release) = &self.release {
                release.notified().await;
            }
            self.result.clone()
        }
    }

    fn filled(form: &ContactForm) {
        form.set_field(FormField::Name, "Jane Doe");
        form.set_field(FormField::Email, "jane@example.com");
        form.set_field(FormField::Message, "Hello, I would like to talk about a project.");
    }

    #[tokio::test]
    async fn success_clears_form_and_notifies() {
        let channel = Arc::new(Scripted::new(Ok(Delivered { message_id: None })));
        let form = ContactForm::new(channel.clone());
        filled(&form);

        let outcome = form.submit().await;

        assert_eq!(outcome, SubmitOutcome::Completed(Notification::success()));
        assert!(form.fields().is_empty());
        assert!(!form.is_submitting());
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_keeps_fields_and_reenables() {
        let channel = Arc::new(Scripted::new(Err(DeliveryError::Rejected {
            reason: "Email authentication failed. Please check your credentials.".to_string(),
        })));
        let form = ContactForm::new(channel);
        filled(&form);

        match form.submit().await {
            SubmitOutcome::Completed(n) => {
                assert_eq!(n.kind, NotificationKind::Error);
                assert_eq!(n.description, "Email authentication failed. Please check your credentials.");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(form.fields().name, "Jane Doe");
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn unavailable_channel_shows_generic_reason() {
        let channel = Arc::new(Scripted::new(Err(DeliveryError::Unavailable {
            detail: "dns error".to_string(),
        })));
        let form = ContactForm::new(channel);
        filled(&form);

        match form.submit().await {
            SubmitOutcome::Completed(n) => assert_eq!(n.description, GENERIC_FAILURE),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_fields_never_reach_channel() {
        let channel = Arc::new(Scripted::new(Ok(Delivered { message_id: None })));
        let form = ContactForm::new(channel.clone());
        form.set_field(FormField::Name, "J");

        match form.submit().await {
            SubmitOutcome::Completed(n) => {
                assert_eq!(n.kind, NotificationKind::Error);
                assert!(n.description.contains("Name must be between 2 and 50 characters"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(channel.calls.load(Ordering::SeqCst), 0);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn duplicate_submit_while_in_flight_is_ignored() {
        let release = Arc::new(Notify::new());
        let channel = Arc::new(Scripted {
            release: Some(release.clone()),
            ..Scripted::new(Ok(Delivered { message_id: None }))
        });
        let form = Arc::new(ContactForm::new(channel.clone()));
        filled(&form);

        let first = tokio::spawn({
            let form = form.clone();
            async move { form.submit().await }
        });
        while !form.is_submitting() {
            tokio::task::yield_now().await;
        }

        assert_eq!(form.submit().await, SubmitOutcome::Ignored);

        release.notify_one();
        assert!(matches!(first.await.unwrap(), SubmitOutcome::Completed(_)));
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
        assert!(!form.is_submitting());
    }
}
