//! crates/contact_form_core/src/validation.rs
//!
//! Field rules for contact form submissions and email normalization.
//!
//! Every rule is evaluated so that the caller receives all violations at once.

use std::str::FromStr;

use lettre::Address;

use crate::domain::{ContactSubmission, FieldError, FormValue, NewContact};

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];
const PLUS_SUBADDRESS_DOMAINS: &[&str] = &[
    "hotmail.com",
    "live.com",
    "msn.com",
    "outlook.com",
    "icloud.com",
    "me.com",
];
const DASH_SUBADDRESS_DOMAINS: &[&str] = &["yahoo.com", "ymail.com", "rocketmail.com"];

/// A length constraint on a trimmed text field.
struct LengthRule {
    field: &'static str,
    min: usize,
    max: usize,
    message: &'static str,
}

const NAME: LengthRule = LengthRule {
    field: "name",
    min: 2,
    max: 100,
    message: "Name must be between 2 and 100 characters",
};

const SUBJECT: LengthRule = LengthRule {
    field: "subject",
    min: 5,
    max: 200,
    message: "Subject must be between 5 and 200 characters",
};

const MESSAGE: LengthRule = LengthRule {
    field: "message",
    min: 10,
    max: 1000,
    message: "Message must be between 10 and 1000 characters",
};

const COMPANY: LengthRule = LengthRule {
    field: "company",
    min: 0,
    max: 100,
    message: "Company name must be less than 100 characters",
};

const PHONE: LengthRule = LengthRule {
    field: "phone",
    min: 0,
    max: 20,
    message: "Phone number must be less than 20 characters",
};

const EMAIL_FIELD: &str = "email";
const EMAIL_MESSAGE: &str = "Please provide a valid email address";

impl LengthRule {
    /// Trims the value and checks its length. A missing value counts as empty.
    fn required(&self, value: Option<&FormValue>, errors: &mut Vec<FieldError>) -> String {
        let Some(text) = self.text(value, errors) else {
            return String::new();
        };
        let trimmed = text.unwrap_or_default().trim();
        let len = trimmed.chars().count();
        if len < self.min || len > self.max {
            errors.push(self.error());
        }
        trimmed.to_string()
    }

    /// Like `required`, but absent or blank values are "not provided" and always pass.
    fn optional(&self, value: Option<&FormValue>, errors: &mut Vec<FieldError>) -> Option<String> {
        let trimmed = self
            .text(value, errors)?
            .map(str::trim)
            .filter(|v| !v.is_empty())?;
        if trimmed.chars().count() > self.max {
            errors.push(self.error());
        }
        Some(trimmed.to_string())
    }

    /// Reports a value without a text form as a violation of this rule.
    fn text<'a>(
        &self,
        value: Option<&'a FormValue>,
        errors: &mut Vec<FieldError>,
    ) -> Option<Option<&'a str>> {
        match value {
            Some(FormValue::Unsupported) => {
                errors.push(self.error());
                None
            }
            other => Some(other.and_then(FormValue::as_text)),
        }
    }

    fn error(&self) -> FieldError {
        FieldError {
            field: self.field,
            message: self.message,
        }
    }
}

/// Validates a raw submission, returning the normalized contact or every violation found.
pub fn validate_submission(submission: &ContactSubmission) -> Result<NewContact, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = NAME.required(submission.name.as_ref(), &mut errors);

    let email = submission
        .email
        .as_ref()
        .and_then(FormValue::as_text)
        .and_then(normalize_email);
    if email.is_none() {
        errors.push(FieldError {
            field: EMAIL_FIELD,
            message: EMAIL_MESSAGE,
        });
    }

    let subject = SUBJECT.required(submission.subject.as_ref(), &mut errors);
    let message = MESSAGE.required(submission.message.as_ref(), &mut errors);
    let company = COMPANY.optional(submission.company.as_ref(), &mut errors);
    let phone = PHONE.optional(submission.phone.as_ref(), &mut errors);

    match email {
        Some(email) if errors.is_empty() => Ok(NewContact {
            name,
            email,
            subject,
            message,
            company,
            phone,
        }),
        _ => Err(errors),
    }
}

/// Checks the address syntax and returns its canonical form, or `None` if it is invalid.
///
/// The input is not trimmed: surrounding whitespace makes the address invalid.
pub fn normalize_email(raw: &str) -> Option<String> {
    if raw.len() > MAX_EMAIL_LEN {
        return None;
    }

    let address = Address::from_str(raw).ok()?;
    let (user, domain) = (address.user(), address.domain());
    if user.len() > MAX_LOCAL_PART_LEN || !is_public_domain(domain) {
        return None;
    }

    let mut user = user.to_lowercase();
    let mut domain = domain.to_lowercase();

    if GMAIL_DOMAINS.contains(&domain.as_str()) {
        user = strip_plus_tag(&user).replace('.', "");
        domain = "gmail.com".to_string();
    } else if PLUS_SUBADDRESS_DOMAINS.contains(&domain.as_str()) {
        user = strip_plus_tag(&user).to_string();
    } else if DASH_SUBADDRESS_DOMAINS.contains(&domain.as_str()) {
        user = strip_dash_tag(&user).to_string();
    }

    if user.is_empty() {
        return None;
    }

    Some(format!("{user}@{domain}"))
}

/// Everything from the first `+` on is a tag.
fn strip_plus_tag(user: &str) -> &str {
    user.split_once('+').map_or(user, |(base, _)| base)
}

/// Only the last `-` segment is a tag, so `jane-doe-tag` keeps `jane-doe`.
fn strip_dash_tag(user: &str) -> &str {
    user.rsplit_once('-').map_or(user, |(base, _)| base)
}

/// Requires a dotted host name whose top-level label is alphabetic or punycode (`xn--`).
fn is_public_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    labels_ok && (is_alphabetic_tld(tld) || is_punycode_tld(tld))
}

fn is_alphabetic_tld(tld: &str) -> bool {
    tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic)
}

fn is_punycode_tld(tld: &str) -> bool {
    tld.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("xn--"))
        && tld.len() > 4
        && tld[4..].chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn submission(name: &str, email: &str, subject: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: Some(name.into()),
            email: Some(email.into()),
            subject: Some(subject.into()),
            message: Some(message.into()),
            company: None,
            phone: None,
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn minimal_lengths_pass_and_blank_optionals_are_not_provided() {
        let mut input = submission("Al", "a@b.com", "Hello there", "1234567890");
        input.company = Some("".into());
        input.phone = Some("   ".into());

        let contact = validate_submission(&input).unwrap();

        assert_eq!(
            contact,
            NewContact {
                name: "Al".into(),
                email: "a@b.com".into(),
                subject: "Hello there".into(),
                message: "1234567890".into(),
                company: None,
                phone: None,
            }
        );
    }

    #[test]
    fn nine_character_message_fails_only_message() {
        let input = submission("Alice", "alice@example.com", "Hello there", "123456789");

        let errors = validate_submission(&input).unwrap_err();

        assert_eq!(
            errors,
            vec![FieldError {
                field: "message",
                message: "Message must be between 10 and 1000 characters",
            }]
        );
    }

    #[test]
    fn invalid_email_is_reported() {
        let input = submission("Alice", "not-an-email", "Hello there", "A long enough message");

        let errors = validate_submission(&input).unwrap_err();

        assert_eq!(
            errors,
            vec![FieldError {
                field: "email",
                message: "Please provide a valid email address",
            }]
        );
    }

    #[test]
    fn every_violation_is_collected() {
        let input = ContactSubmission {
            name: Some(" A ".into()),
            email: None,
            subject: Some("Hey".into()),
            message: Some("short".into()),
            company: Some("c".repeat(101).into()),
            phone: Some("1".repeat(21).into()),
        };

        let errors = validate_submission(&input).unwrap_err();

        assert_eq!(
            fields(&errors),
            vec!["name", "email", "subject", "message", "company", "phone"]
        );
    }

    #[test]
    fn lengths_are_checked_after_trimming() {
        let input = submission("  A  ", "alice@example.com", "  Hi!  ", "  123456789  ");

        let errors = validate_submission(&input).unwrap_err();

        assert_eq!(fields(&errors), vec!["name", "subject", "message"]);
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        let mut input = submission(
            &"n".repeat(100),
            "alice@example.com",
            &"s".repeat(200),
            &"m".repeat(1000),
        );
        input.company = Some("c".repeat(100).into());
        input.phone = Some("1".repeat(20).into());
        assert!(validate_submission(&input).is_ok());

        input.name = Some("n".repeat(101).into());
        input.message = Some("m".repeat(1001).into());
        let errors = validate_submission(&input).unwrap_err();
        assert_eq!(fields(&errors), vec!["name", "message"]);
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let input = submission("Zoë", "zoe@example.com", "Grüße!", "ééééééééé");

        let errors = validate_submission(&input).unwrap_err();

        assert_eq!(fields(&errors), vec!["message"]);
    }

    #[test]
    fn stored_values_are_trimmed() {
        let mut input = submission("  Alice  ", "alice@example.com", " Hello there ", " Long message here ");
        input.company = Some("  ACME  ".into());

        let contact = validate_submission(&input).unwrap();

        assert_eq!(contact.name, "Alice");
        assert_eq!(contact.subject, "Hello there");
        assert_eq!(contact.message, "Long message here");
        assert_eq!(contact.company.as_deref(), Some("ACME"));
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(
            normalize_email("Alice.Smith@Example.COM").as_deref(),
            Some("alice.smith@example.com")
        );
    }

    #[test]
    fn gmail_addresses_are_canonicalized() {
        assert_eq!(
            normalize_email("John.Doe+news@GoogleMail.com").as_deref(),
            Some("johndoe@gmail.com")
        );
    }

    #[test]
    fn provider_subaddresses_are_removed() {
        assert_eq!(
            normalize_email("jane+tag@outlook.com").as_deref(),
            Some("jane@outlook.com")
        );
        assert_eq!(
            normalize_email("jane-tag@yahoo.com").as_deref(),
            Some("jane@yahoo.com")
        );
        assert_eq!(
            normalize_email("jane-doe-tag@yahoo.com").as_deref(),
            Some("jane-doe@yahoo.com")
        );
        assert_eq!(
            normalize_email("jane+tag@example.com").as_deref(),
            Some("jane+tag@example.com")
        );
    }

    #[test]
    fn punycode_top_level_domains_are_accepted() {
        assert_eq!(
            normalize_email("ivan@example.xn--p1ai").as_deref(),
            Some("ivan@example.xn--p1ai")
        );
        assert_eq!(normalize_email("ivan@example.xn--"), None);
    }

    #[test]
    fn values_without_text_form_fail_their_own_rule() {
        let mut input = submission("Alice", "alice@example.com", "Hello there", "A long enough message");
        input.name = Some(FormValue::Unsupported);
        input.email = Some(FormValue::Unsupported);
        input.phone = Some(FormValue::Unsupported);

        let errors = validate_submission(&input).unwrap_err();

        assert_eq!(fields(&errors), vec!["name", "email", "phone"]);
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in [
            "",
            "not-an-email",
            "a@b",
            "a@b.c",
            "a@-b.com",
            "a@b..com",
            "@example.com",
            " alice@example.com",
            "alice@example.com ",
            "+news@gmail.com",
        ] {
            assert_eq!(normalize_email(raw), None, "{raw:?} should be rejected");
        }
    }
}
