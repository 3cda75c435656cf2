//! Candidate-detail validation.
//!
//! Two layers share the same field rules: `validate_details` checks a freshly parsed
//! resume and reports every field that needs correction, and `check_correction`
//! validates a single chat reply against the rule for the field currently at the
//! front of the correction queue.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::interview::models::CandidateDetails;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Digits expected in a phone number after sanitization.
const PHONE_DIGITS: usize = 10;

/// A candidate-detail field that still needs a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionField {
    Name,
    Email,
    Phone,
}

/// Result of validating a full set of candidate details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub fields_to_correct: Vec<CorrectionField>,
}

/// Checks every field unconditionally and independently. The returned order is
/// always `[name?, email?, phone?]`.
pub fn validate_details(details: &CandidateDetails) -> ValidationReport {
    let mut fields_to_correct = Vec::new();

    if !is_valid_name(details.name.as_deref()) {
        fields_to_correct.push(CorrectionField::Name);
    }
    if !is_valid_email(details.email.as_deref()) {
        fields_to_correct.push(CorrectionField::Email);
    }
    if !is_valid_phone(details.phone.as_deref()) {
        fields_to_correct.push(CorrectionField::Phone);
    }

    ValidationReport {
        is_valid: fields_to_correct.is_empty(),
        fields_to_correct,
    }
}

/// Strips whitespace and the separator characters `(` `)` `-` `+`.
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '-' | '+'))
        .collect()
}

fn is_valid_name(name: Option<&str>) -> bool {
    name.is_some_and(|n| !n.trim().is_empty())
}

fn is_valid_email(email: Option<&str>) -> bool {
    email.is_some_and(|e| EMAIL_REGEX.is_match(e))
}

/// Valid when the last 10 characters of the sanitized value are exactly 10 digits.
fn is_valid_phone(phone: Option<&str>) -> bool {
    phone.is_some_and(|p| last_ten_digits(&sanitize_phone(p)).is_some())
}

/// The last 10 characters of `sanitized`, if they exist and are all ASCII digits.
fn last_ten_digits(sanitized: &str) -> Option<String> {
    let chars: Vec<char> = sanitized.chars().collect();
    if chars.len() < PHONE_DIGITS {
        return None;
    }
    let tail: String = chars[chars.len() - PHONE_DIGITS..].iter().collect();
    tail.chars()
        .all(|c| c.is_ascii_digit())
        .then_some(tail)
}

/// Validates a chat reply for the given correction field.
///
/// Returns the value to store on success: the reply itself for name and email, the
/// sanitized trailing 10 digits for phone. `None` means the reply was rejected and
/// the queue must not advance.
pub fn check_correction(field: CorrectionField, reply: &str) -> Option<String> {
    match field {
        CorrectionField::Name => (reply.trim().len() > 2).then(|| reply.trim().to_string()),
        CorrectionField::Email => EMAIL_REGEX
            .is_match(reply.trim())
            .then(|| reply.trim().to_string()),
        CorrectionField::Phone => last_ten_digits(&sanitize_phone(reply)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> CandidateDetails {
        CandidateDetails {
            name: name.map(String::from),
            email: email.map(String::from),
            phone: phone.map(String::from),
        }
    }

    #[test]
    fn test_all_valid() {
        let report = validate_details(&details(
            Some("Jane Doe"),
            Some("jane@example.com"),
            Some("555-123-4567"),
        ));
        assert!(report.is_valid);
        assert!(report.fields_to_correct.is_empty());
    }

    #[test]
    fn test_missing_name() {
        let report = validate_details(&details(None, Some("jane@example.com"), Some("5551234567")));
        assert_eq!(report.fields_to_correct, vec![CorrectionField::Name]);
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let report = validate_details(&details(
            Some("   "),
            Some("jane@example.com"),
            Some("5551234567"),
        ));
        assert_eq!(report.fields_to_correct, vec![CorrectionField::Name]);
    }

    #[test]
    fn test_bad_email_only() {
        let report = validate_details(&details(Some("Jane Doe"), Some("bad-email"), Some("5551234567")));
        assert!(!report.is_valid);
        assert_eq!(report.fields_to_correct, vec![CorrectionField::Email]);
    }

    #[test]
    fn test_email_requires_domain_dot() {
        assert!(!is_valid_email(Some("jane@example")));
        assert!(is_valid_email(Some("jane@example.co.uk")));
    }

    #[test]
    fn test_email_rejects_whitespace() {
        assert!(!is_valid_email(Some("jane doe@example.com")));
    }

    #[test]
    fn test_no_short_circuit_reports_every_failure() {
        let report = validate_details(&details(None, Some("jane@example.com"), Some("123")));
        assert_eq!(
            report.fields_to_correct,
            vec![CorrectionField::Name, CorrectionField::Phone]
        );
    }

    #[test]
    fn test_all_invalid_keeps_field_order() {
        let report = validate_details(&details(None, None, None));
        assert_eq!(
            report.fields_to_correct,
            vec![
                CorrectionField::Name,
                CorrectionField::Email,
                CorrectionField::Phone
            ]
        );
    }

    #[test]
    fn test_phone_with_separators() {
        assert!(is_valid_phone(Some("(555) 123-4567")));
        assert!(is_valid_phone(Some("+1 555 123 4567")));
    }

    #[test]
    fn test_phone_country_code_uses_trailing_digits() {
        // 11 digits after stripping; only the last 10 are checked.
        assert!(is_valid_phone(Some("+15551234567")));
    }

    #[test]
    fn test_phone_too_short() {
        assert!(!is_valid_phone(Some("123-4567")));
    }

    #[test]
    fn test_phone_with_letters() {
        assert!(!is_valid_phone(Some("555-CALL-NOW")));
    }

    #[test]
    fn test_sanitize_phone_is_idempotent() {
        let raw = "+1 (555) 123-4567";
        let once = sanitize_phone(raw);
        assert_eq!(sanitize_phone(&once), once);
        assert_eq!(once, "15551234567");
    }

    #[test]
    fn test_check_correction_name() {
        assert_eq!(
            check_correction(CorrectionField::Name, "Jane Doe"),
            Some("Jane Doe".to_string())
        );
        assert_eq!(check_correction(CorrectionField::Name, "Jo"), None);
    }

    #[test]
    fn test_check_correction_email() {
        assert_eq!(
            check_correction(CorrectionField::Email, "jane@example.com"),
            Some("jane@example.com".to_string())
        );
        assert_eq!(check_correction(CorrectionField::Email, "not-an-email"), None);
    }

    #[test]
    fn test_check_correction_phone_stores_sanitized_tail() {
        assert_eq!(
            check_correction(CorrectionField::Phone, "+1 (555) 123-4567"),
            Some("5551234567".to_string())
        );
        assert_eq!(check_correction(CorrectionField::Phone, "12345"), None);
    }
}
