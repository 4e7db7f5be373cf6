//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ContactStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contact_form_core::domain::{ContactRecord, NewContact};
use contact_form_core::ports::{ContactStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ContactStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    subject: String,
    message: String,
    company: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}
impl ContactRow {
    fn to_domain(self) -> ContactRecord {
        ContactRecord {
            id: self.id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            company: self.company,
            phone: self.phone,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `ContactStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContactStore for DbAdapter {
    #[tracing::instrument(name = "Insert contact", skip_all)]
    async fn insert_contact(&self, contact: NewContact) -> PortResult<ContactRecord> {
        let record = sqlx::query_as::<_, ContactRow>(
            "INSERT INTO contacts (id, name, email, company, phone, subject, message, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, name, email, company, phone, subject, message, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.company)
        .bind(&contact.phone)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain())
    }

    async fn ping(&self) -> PortResult<()> {
        sqlx::query("SELECT id FROM contacts LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
