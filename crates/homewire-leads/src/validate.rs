//! Submission validation using compiled regex patterns.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ContactSubmission, RegistrationSubmission, ValidationError};

// Full-match address pattern: rejects missing TLDs and doubled '@'.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Validate an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate a phone number: 10–11 digits after stripping formatting.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=11).contains(&digits)
}

fn check_common(
    first_name: &str,
    email: &str,
    phone: Option<&str>,
    reason: &str,
    errors: &mut Vec<ValidationError>,
) {
    if first_name.trim().is_empty() {
        errors.push(ValidationError::new("firstName", "Name is required"));
    }
    if email.trim().is_empty() {
        errors.push(ValidationError::new("email", "Email is required"));
    } else if !is_valid_email(email.trim()) {
        errors.push(ValidationError::new("email", "Enter a valid email address"));
    }
    if let Some(phone) = phone {
        if !phone.trim().is_empty() && !is_valid_phone(phone) {
            errors.push(ValidationError::new(
                "phone",
                "Enter a valid 10 or 11 digit phone number",
            ));
        }
    }
    if reason.trim().is_empty() {
        errors.push(ValidationError::new(
            "reason",
            "Tell us what you're contacting about",
        ));
    }
}

/// Validate a contact-form submission. Empty result means acceptable; any
/// violation rejects the whole submission.
pub fn validate_contact(submission: &ContactSubmission) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_common(
        &submission.first_name,
        &submission.email,
        submission.phone.as_deref(),
        &submission.reason,
        &mut errors,
    );
    if submission.message.trim().is_empty() {
        errors.push(ValidationError::new("message", "Message is required"));
    }
    errors
}

/// Validate a registration submission. No message field on this form.
pub fn validate_registration(submission: &RegistrationSubmission) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_common(
        &submission.first_name,
        &submission.email,
        submission.phone.as_deref(),
        &submission.reason,
        &mut errors,
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@mail.co.uk"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user@@x.com"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("4165551234"));
        assert!(is_valid_phone("(416) 555-1234"));
        assert!(is_valid_phone("+1 416 555 1234"));
        assert!(!is_valid_phone("555-1234"));
        assert!(!is_valid_phone("+44 20 7946 0958 123"));
    }

    fn contact() -> ContactSubmission {
        ContactSubmission {
            first_name: "Ava".into(),
            last_name: "Chen".into(),
            email: "ava@example.com".into(),
            phone: Some("4165551234".into()),
            reason: "buying".into(),
            message: "Looking in Markham".into(),
            source: "contact-form".into(),
        }
    }

    #[test]
    fn test_valid_contact_passes() {
        assert!(validate_contact(&contact()).is_empty());
    }

    #[test]
    fn test_field_level_errors() {
        let mut bad = contact();
        bad.first_name = " ".into();
        bad.email = "ava@domain".into();
        bad.message = String::new();

        let errors = validate_contact(&bad);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["firstName", "email", "message"]);
    }

    #[test]
    fn test_blank_phone_is_not_an_error() {
        let mut submission = contact();
        submission.phone = Some("".into());
        assert!(validate_contact(&submission).is_empty());
    }

    #[test]
    fn test_registration_has_no_message_requirement() {
        let registration = RegistrationSubmission {
            first_name: "Ava".into(),
            last_name: String::new(),
            email: "ava@example.com".into(),
            phone: None,
            reason: "investing".into(),
            project: Some("The Wells".into()),
            timeline: None,
            budget_range: None,
            message: String::new(),
            source: "registration".into(),
        };
        assert!(validate_registration(&registration).is_empty());
    }
}
