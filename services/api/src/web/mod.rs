pub mod rest;
pub mod state;

pub use rest::{connection_test_handler, health_handler, submit_contact_handler};

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use rest::ApiDoc;
use state::AppState;

/// Builds the CORS layer. Without a configured origin any origin is allowed.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, ApiError> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    match allowed_origin {
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|e| {
                ApiError::Internal(format!("Invalid CORS_ALLOWED_ORIGIN '{}': {}", origin, e))
            })?;
            Ok(cors.allow_origin(origin))
        }
        None => Ok(cors.allow_origin(tower_http::cors::Any)),
    }
}

/// Creates the complete application router, including the Swagger UI.
pub fn build_router(app_state: Arc<AppState>, cors: CorsLayer) -> Router {
    let api_router = Router::new()
        .route("/contact", post(submit_contact_handler))
        .route("/health", get(health_handler))
        .route("/test", get(connection_test_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
