//! crates/contact_form_core/src/ports.rs
//!
//! Defines the service contracts (traits) the contact handler depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the database and mail transport actually used.

use async_trait::async_trait;

use crate::domain::{ContactRecord, NewContact, OutgoingEmail};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, SMTP).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Service is not configured: {0}")]
    Misconfigured(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persists a validated submission, assigning its identifier and creation time.
    async fn insert_contact(&self, contact: NewContact) -> PortResult<ContactRecord>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> PortResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one email and returns the message id assigned to it.
    async fn send(&self, email: OutgoingEmail) -> PortResult<String>;
}
