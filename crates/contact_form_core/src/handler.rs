//! crates/contact_form_core/src/handler.rs
//!
//! The contact submission pipeline: validate, persist, then notify.
//!
//! Persistence is the only hard dependency. The two notifications run
//! concurrently once the record exists and their failures only degrade the
//! corresponding outcome flag.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{
    ContactSubmission, FieldError, NotificationOutcome, OutgoingEmail, SubmissionReceipt,
};
use crate::notifications::EmailTemplates;
use crate::ports::{ContactStore, Mailer, PortError};
use crate::validation::validate_submission;

/// Why a submission did not produce a receipt.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// One or more field rules were violated. Nothing was stored or sent.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// The record could not be written. No notification was attempted.
    #[error("Failed to save contact form data")]
    Persistence(#[from] PortError),
}

pub struct ContactSubmissionHandler {
    store: Arc<dyn ContactStore>,
    mailer: Arc<dyn Mailer>,
    templates: EmailTemplates,
    admin_email: String,
}

impl ContactSubmissionHandler {
    pub fn new(
        store: Arc<dyn ContactStore>,
        mailer: Arc<dyn Mailer>,
        templates: EmailTemplates,
        admin_email: String,
    ) -> Self {
        Self {
            store,
            mailer,
            templates,
            admin_email,
        }
    }

    /// Runs one submission through the pipeline.
    #[tracing::instrument(name = "Handle contact submission", skip_all)]
    pub async fn handle(
        &self,
        submission: ContactSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let contact = validate_submission(&submission).map_err(|errors| {
            info!(error_count = errors.len(), "Contact submission rejected");
            SubmissionError::Validation(errors)
        })?;

        let record = self.store.insert_contact(contact).await.map_err(|e| {
            error!("Failed to store contact submission: {:?}", e);
            SubmissionError::Persistence(e)
        })?;
        info!(
            contact_id = %record.id,
            email = %redact_email(&record.email),
            "Contact submission stored"
        );

        let (admin_email_sent, confirmation_email_sent) = futures::join!(
            self.notify(
                "admin",
                self.templates.admin_notification(&self.admin_email, &record),
            ),
            self.notify(
                "confirmation",
                self.templates.confirmation_notification(&record),
            ),
        );

        Ok(SubmissionReceipt {
            contact_id: record.id,
            notifications: NotificationOutcome {
                admin_email_sent,
                confirmation_email_sent,
            },
        })
    }

    async fn notify(
        &self,
        kind: &'static str,
        email: Result<OutgoingEmail, tera::Error>,
    ) -> bool {
        let email = match email {
            Ok(email) => email,
            Err(e) => {
                warn!(kind, error = %e, "Failed to render notification email");
                return false;
            }
        };

        match self.mailer.send(email).await {
            Ok(message_id) => {
                info!(kind, %message_id, "Notification email sent");
                true
            }
            Err(e) => {
                warn!(kind, error = %e, "Failed to send notification email");
                false
            }
        }
    }
}

/// Masks the local part of an address for logging, keeping its first character.
pub fn redact_email(email: &str) -> String {
    match email.split_once('@') {
        Some((user, domain)) => {
            let first: String = user.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}
