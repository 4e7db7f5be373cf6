pub mod domain;
pub mod handler;
pub mod notifications;
pub mod ports;
pub mod validation;

pub use domain::{
    ContactRecord, ContactSubmission, FieldError, FormValue, NewContact, NotificationOutcome,
    OutgoingEmail, SubmissionReceipt,
};
pub use handler::{ContactSubmissionHandler, SubmissionError};
pub use ports::{ContactStore, Mailer, PortError, PortResult};
