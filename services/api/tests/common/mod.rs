use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use chrono::Utc;
use contact_api_lib::web::{build_router, cors_layer, state::AppState};
use contact_form_core::domain::{ContactRecord, NewContact, OutgoingEmail};
use contact_form_core::ports::{ContactStore, Mailer, PortError, PortResult};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";

/// In-memory contact store that records every insert.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingStore {
    inserted: Arc<Mutex<Vec<ContactRecord>>>,
    failing: bool,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn inserted(&self) -> Vec<ContactRecord> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactStore for RecordingStore {
    async fn insert_contact(&self, contact: NewContact) -> PortResult<ContactRecord> {
        if self.failing {
            return Err(PortError::Unexpected("connection refused".into()));
        }
        let record = ContactRecord::new(Uuid::new_v4(), contact, Utc::now());
        self.inserted.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> PortResult<()> {
        if self.failing {
            return Err(PortError::Unexpected("connection refused".into()));
        }
        Ok(())
    }
}

/// Mailer that records every attempt and fails for configured recipients.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingMailer {
    attempts: Arc<Mutex<Vec<OutgoingEmail>>>,
    failing_recipients: Vec<String>,
}

#[allow(dead_code)]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            failing_recipients: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> Vec<OutgoingEmail> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> PortResult<String> {
        let fails = self.failing_recipients.contains(&email.to);
        self.attempts.lock().unwrap().push(email);
        if fails {
            return Err(PortError::Unexpected("550 mailbox unavailable".into()));
        }
        Ok(format!("<{}@example.com>", Uuid::new_v4()))
    }
}

pub fn app(store: RecordingStore, mailer: RecordingMailer) -> Router {
    let state = Arc::new(AppState::new(
        Arc::new(store),
        Arc::new(mailer),
        ADMIN_EMAIL.to_string(),
    )
    .unwrap());
    build_router(state, cors_layer(None).unwrap())
}

#[allow(dead_code)]
pub async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
