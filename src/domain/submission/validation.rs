//! Field-level checks applied both before the client sends and again in the relay.

use email_address::{EmailAddress, Options};

use super::{
    ContactSubmission, FieldError, ValidSubmission, MESSAGE_MAX_CHARS, MESSAGE_MIN_CHARS,
    NAME_MAX_CHARS, NAME_MIN_CHARS, SUBJECT_MAX_CHARS,
};

pub const NAME_LENGTH_MSG: &str = "Name must be between 2 and 50 characters";
pub const EMAIL_INVALID_MSG: &str = "Please provide a valid email";
pub const MESSAGE_LENGTH_MSG: &str = "Message must be between 10 and 2000 characters";
pub const SUBJECT_LENGTH_MSG: &str = "Subject must be at most 200 characters";

/// Validates the three required fields. The optional subject is carried
/// through trimmed but not checked; the relay never receives one.
pub fn validate(submission: &ContactSubmission) -> Result<ValidSubmission, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = submission.name.trim();
    if !within(name, NAME_MIN_CHARS, NAME_MAX_CHARS) {
        errors.push(FieldError::new("name", NAME_LENGTH_MSG, &submission.name));
    }

    let email = normalize_email(&submission.email);
    if email.is_none() {
        errors.push(FieldError::new("email", EMAIL_INVALID_MSG, &submission.email));
    }

    let message = submission.message.trim();
    if !within(message, MESSAGE_MIN_CHARS, MESSAGE_MAX_CHARS) {
        errors.push(FieldError::new("message", MESSAGE_LENGTH_MSG, &submission.message));
    }

    match email {
        Some(email) if errors.is_empty() => Ok(ValidSubmission {
            name: name.to_string(),
            email,
            message: message.to_string(),
            subject: submission
                .subject
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }),
        _ => Err(errors),
    }
}

/// Like [`validate`], additionally bounding the optional subject used by the
/// hosted delivery channel.
pub fn validate_with_subject(
    submission: &ContactSubmission,
) -> Result<ValidSubmission, Vec<FieldError>> {
    let subject_error = submission
        .subject
        .as_deref()
        .filter(|s| s.trim().chars().count() > SUBJECT_MAX_CHARS)
        .map(|s| FieldError::new("subject", SUBJECT_LENGTH_MSG, s));

    match (validate(submission), subject_error) {
        (Ok(valid), None) => Ok(valid),
        (Ok(_), Some(err)) => Err(vec![err]),
        (Err(mut errors), Some(err)) => {
            errors.push(err);
            Err(errors)
        }
        (Err(errors), None) => Err(errors),
    }
}

/// Bare `local@domain.tld` only: no display text, no domain literals, and the
/// domain needs at least one dot.
fn email_options() -> Options {
    Options::default()
        .with_required_tld()
        .without_domain_literal()
        .without_display_text()
}

/// Trims and lowercases an address, returning `None` when it is not a
/// syntactically valid email.
pub fn normalize_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    EmailAddress::parse_with_options(trimmed, email_options())
        .ok()
        .filter(|parsed| parsed.display_part().is_empty())
        .map(|parsed| parsed.email().to_lowercase())
}

fn within(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    (min..=max).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
        ContactSubmission::new(name, email, message)
    }

    #[test]
    fn accepts_and_normalizes_valid_submission() {
        let valid = validate(&submission(
            "  Jane Doe ",
            " Jane@Example.COM ",
            "Hello, I would like to discuss a project with you.",
        ))
        .unwrap();
        assert_eq!(valid.name, "Jane Doe");
        assert_eq!(valid.email, "jane@example.com");
        assert_eq!(valid.message, "Hello, I would like to discuss a project with you.");
    }

    #[test]
    fn reports_every_failing_field_in_order() {
        let errors = validate(&submission("J", "not-an-email", "hi")).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
        assert_eq!(errors[0].message, NAME_LENGTH_MSG);
        assert_eq!(errors[1].message, EMAIL_INVALID_MSG);
        assert_eq!(errors[2].message, MESSAGE_LENGTH_MSG);
        assert_eq!(errors[1].value, "not-an-email");
    }

    #[test]
    fn name_bounds_are_inclusive_and_trimmed() {
        let msg = "long enough message";
        assert!(validate(&submission("Jo", "a@b.com", msg)).is_ok());
        assert!(validate(&submission(&"x".repeat(50), "a@b.com", msg)).is_ok());
        assert!(validate(&submission(&"x".repeat(51), "a@b.com", msg)).is_err());
        // whitespace does not count toward the minimum
        assert!(validate(&submission("  J  ", "a@b.com", msg)).is_err());
    }

    #[test]
    fn message_bounds_count_characters_not_bytes() {
        assert!(validate(&submission("Jane", "a@b.com", &"é".repeat(10))).is_ok());
        assert!(validate(&submission("Jane", "a@b.com", &"x".repeat(2000))).is_ok());
        assert!(validate(&submission("Jane", "a@b.com", &"x".repeat(2001))).is_err());
        assert!(validate(&submission("Jane", "a@b.com", "123456789")).is_err());
    }

    #[test]
    fn display_text_is_not_an_email() {
        assert_eq!(normalize_email("Jane Doe <jane@example.com>"), None);
        let errors = validate(&submission(
            "Jane Doe",
            "Jane Doe <jane@example.com>",
            "long enough message",
        ))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn email_needs_a_dotted_domain_name() {
        assert_eq!(normalize_email("jane@example"), None);
        assert_eq!(normalize_email("jane@[127.0.0.1]"), None);
        assert_eq!(
            normalize_email("jane@example.com").as_deref(),
            Some("jane@example.com")
        );
        assert_eq!(
            normalize_email("Jane@Mail.Example.co.uk").as_deref(),
            Some("jane@mail.example.co.uk")
        );
    }

    #[test]
    fn empty_fields_fail() {
        let errors = validate(&ContactSubmission::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn subject_is_bounded_only_when_requested() {
        let long = submission("Jane", "a@b.com", "a valid message").with_subject("s".repeat(201));
        assert!(validate(&long).is_ok());
        let errors = validate_with_subject(&long).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "subject");

        let blank = submission("Jane", "a@b.com", "a valid message").with_subject("   ");
        assert_eq!(validate_with_subject(&blank).unwrap().subject, None);
    }
}
