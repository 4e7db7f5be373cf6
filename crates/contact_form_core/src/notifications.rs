//! crates/contact_form_core/src/notifications.rs
//!
//! Templates for the two emails sent after a submission is stored.
//!
//! Bodies are rendered by `tera`. Template names end in `.html`, so every
//! interpolated value is HTML-escaped.

use std::sync::Arc;

use serde::Serialize;
use tera::Tera;

use crate::domain::{ContactRecord, OutgoingEmail};

/// Admin destination used when no override is configured.
pub const DEFAULT_ADMIN_EMAIL: &str = "contact@vhatrade.ca";

const ADMIN_SUBJECT_PREFIX: &str = "New Contact Form Submission: ";
const CONFIRMATION_SUBJECT: &str = "Thank you for contacting VHATrade";
const NOT_PROVIDED: &str = "Not provided";

const ADMIN_TEMPLATE_NAME: &str = "admin_notification.html";
const CONFIRMATION_TEMPLATE_NAME: &str = "confirmation.html";

const TEMPLATES: &[(&str, &str)] = &[
    (
        ADMIN_TEMPLATE_NAME,
        include_str!("../templates/admin_notification.html"),
    ),
    (
        CONFIRMATION_TEMPLATE_NAME,
        include_str!("../templates/confirmation.html"),
    ),
];

#[derive(Serialize)]
struct AdminNotificationTemplate<'a> {
    name: &'a str,
    email: &'a str,
    company: &'a str,
    phone: &'a str,
    subject: &'a str,
    message: &'a str,
    submitted_on: String,
}

#[derive(Serialize)]
struct ConfirmationTemplate<'a> {
    name: &'a str,
}

/// The compiled notification templates, shared by every request.
#[derive(Debug, Clone)]
pub struct EmailTemplates(Arc<Tera>);

impl EmailTemplates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template)?;
        }
        Ok(Self(tera.into()))
    }

    /// Builds the notification sent to the admin for a stored contact.
    pub fn admin_notification(
        &self,
        admin_email: &str,
        contact: &ContactRecord,
    ) -> Result<OutgoingEmail, tera::Error> {
        let template = AdminNotificationTemplate {
            name: &contact.name,
            email: &contact.email,
            company: contact.company.as_deref().unwrap_or(NOT_PROVIDED),
            phone: contact.phone.as_deref().unwrap_or(NOT_PROVIDED),
            subject: &contact.subject,
            message: &contact.message,
            submitted_on: contact
                .created_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        };

        Ok(OutgoingEmail {
            to: admin_email.to_string(),
            reply_to: Some(contact.email.clone()),
            subject: format!("{ADMIN_SUBJECT_PREFIX}{}", contact.subject),
            html_body: self.render(ADMIN_TEMPLATE_NAME, &template)?,
        })
    }

    /// Builds the thank-you email sent back to the submitter.
    pub fn confirmation_notification(
        &self,
        contact: &ContactRecord,
    ) -> Result<OutgoingEmail, tera::Error> {
        let template = ConfirmationTemplate {
            name: &contact.name,
        };

        Ok(OutgoingEmail {
            to: contact.email.clone(),
            reply_to: None,
            subject: CONFIRMATION_SUBJECT.to_string(),
            html_body: self.render(CONFIRMATION_TEMPLATE_NAME, &template)?,
        })
    }

    fn render(&self, name: &str, template: &impl Serialize) -> Result<String, tera::Error> {
        let context = tera::Context::from_serialize(template)?;
        self.0.render(name, &context)
    }
}
