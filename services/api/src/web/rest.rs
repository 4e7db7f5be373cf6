//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use contact_form_core::domain::{ContactSubmission, FieldError, FormValue};
use contact_form_core::handler::SubmissionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        submit_contact_handler,
        health_handler,
        connection_test_handler,
    ),
    components(
        schemas(
            ContactRequest,
            ContactAcceptedResponse,
            ContactRejectedResponse,
            ContactFailedResponse,
            FieldErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Contact API", description = "Contact form submission and service probes.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A contact form submission.
///
/// Fields are read as loose JSON so that a wrongly typed field is reported
/// against that field instead of rejecting the whole body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContactRequest {
    /// Full name, 2 to 100 characters
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    /// Reply address of the submitter
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    /// 5 to 200 characters
    #[schema(value_type = Option<String>)]
    pub subject: Option<Value>,
    /// 10 to 1000 characters
    #[schema(value_type = Option<String>)]
    pub message: Option<Value>,
    /// At most 100 characters
    #[schema(value_type = Option<String>)]
    pub company: Option<Value>,
    /// At most 20 characters
    #[schema(value_type = Option<String>)]
    pub phone: Option<Value>,
}

impl From<ContactRequest> for ContactSubmission {
    fn from(value: ContactRequest) -> Self {
        Self {
            name: form_value(value.name),
            email: form_value(value.email),
            subject: form_value(value.subject),
            message: form_value(value.message),
            company: form_value(value.company),
            phone: form_value(value.phone),
        }
    }
}

/// Scalars are taken by their text form; arrays and objects have none.
fn form_value(value: Option<Value>) -> Option<FormValue> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(FormValue::Text(text)),
        Value::Number(number) => Some(FormValue::Text(number.to_string())),
        Value::Bool(flag) => Some(FormValue::Text(flag.to_string())),
        Value::Array(_) | Value::Object(_) => Some(FormValue::Unsupported),
    }
}

/// The submission was stored. Email flags report each notification attempt.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactAcceptedResponse {
    success: bool,
    message: String,
    contact_id: Uuid,
    admin_email_sent: bool,
    confirmation_email_sent: bool,
}

#[derive(Serialize, ToSchema)]
pub struct FieldErrorResponse {
    field: String,
    message: String,
}

impl From<FieldError> for FieldErrorResponse {
    fn from(value: FieldError) -> Self {
        Self {
            field: value.field.to_string(),
            message: value.message.to_string(),
        }
    }
}

/// One or more fields were invalid. Nothing was stored.
#[derive(Serialize, ToSchema)]
pub struct ContactRejectedResponse {
    success: bool,
    message: String,
    errors: Vec<FieldErrorResponse>,
}

/// The request could not be processed.
#[derive(Serialize, ToSchema)]
pub struct ContactFailedResponse {
    success: bool,
    message: String,
    error: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Submit the contact form.
///
/// Validates the form, stores it, then notifies the admin and the submitter.
/// Email failures are reported in the response flags and never fail the request.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Submission stored", body = ContactAcceptedResponse),
        (status = 400, description = "Validation failed", body = ContactRejectedResponse),
        (status = 500, description = "Submission could not be stored", body = ContactFailedResponse)
    )
)]
pub async fn submit_contact_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let body = ContactFailedResponse {
                success: false,
                message: "Invalid request body".to_string(),
                error: rejection.body_text(),
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match app_state.contacts.handle(request.into()).await {
        Ok(receipt) => Json(ContactAcceptedResponse {
            success: true,
            message: "Contact form submitted successfully!".to_string(),
            contact_id: receipt.contact_id,
            admin_email_sent: receipt.notifications.admin_email_sent,
            confirmation_email_sent: receipt.notifications.confirmation_email_sent,
        })
        .into_response(),
        Err(SubmissionError::Validation(errors)) => {
            let body = ContactRejectedResponse {
                success: false,
                message: "Validation failed".to_string(),
                errors: errors.into_iter().map(Into::into).collect(),
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        Err(e @ SubmissionError::Persistence(_)) => {
            let body = ContactFailedResponse {
                success: false,
                message: "Failed to process contact form".to_string(),
                error: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Database connectivity probe.
#[utoipa::path(
    get,
    path = "/test",
    responses(
        (status = 200, description = "Database is reachable"),
        (status = 500, description = "Database is unreachable")
    )
)]
pub async fn connection_test_handler(State(app_state): State<Arc<AppState>>) -> Response {
    match app_state.store.ping().await {
        Ok(()) => Json(serde_json::json!({
            "message": "Successfully connected to the database!",
        }))
        .into_response(),
        Err(e) => {
            error!("Database connection error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to connect to the database",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
