//! crates/contact_form_core/src/domain.rs
//!
//! Defines the pure, core data structures for the contact form.
//! These structs are independent of any database or transport format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A contact form payload exactly as the client sent it.
///
/// Every field is optional here so that a missing required field is reported
/// by validation rather than rejected by the transport layer.
#[derive(Debug, Clone, Default)]
pub struct ContactSubmission {
    pub name: Option<FormValue>,
    pub email: Option<FormValue>,
    pub subject: Option<FormValue>,
    pub message: Option<FormValue>,
    pub company: Option<FormValue>,
    pub phone: Option<FormValue>,
}

/// A single submitted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Text, or a scalar the transport layer converted to text.
    Text(String),
    /// A value that has no text form, such as a list or an object.
    Unsupported,
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Unsupported => None,
        }
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A submission that passed every field rule.
///
/// Text fields are trimmed and the email is normalized. Optional fields that
/// were absent or blank are `None`, which is persisted as "not provided".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// The durable form of a validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Materializes a record from a validated submission.
    pub fn new(id: Uuid, contact: NewContact, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: contact.name,
            email: contact.email,
            subject: contact.subject,
            message: contact.message,
            company: contact.company,
            phone: contact.phone,
            created_at,
        }
    }
}

/// One violated field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Whether each notification attempt succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub admin_email_sent: bool,
    pub confirmation_email_sent: bool,
}

/// The result of a submission that reached the contact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub contact_id: Uuid,
    pub notifications: NotificationOutcome,
}

/// An email ready to be handed to a `Mailer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
}
