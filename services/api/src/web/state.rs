//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::error::ApiError;
use contact_form_core::handler::ContactSubmissionHandler;
use contact_form_core::notifications::EmailTemplates;
use contact_form_core::ports::{ContactStore, Mailer};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub contacts: Arc<ContactSubmissionHandler>,
}

impl AppState {
    /// Compiles the email templates and wires the contact handler to the given adapters.
    pub fn new(
        store: Arc<dyn ContactStore>,
        mailer: Arc<dyn Mailer>,
        admin_email: String,
    ) -> Result<Self, ApiError> {
        let contacts = Arc::new(ContactSubmissionHandler::new(
            store.clone(),
            mailer,
            EmailTemplates::new()?,
            admin_email,
        ));
        Ok(Self { store, contacts })
    }
}
