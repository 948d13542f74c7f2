//! HTTP layer - router, shared state and error mapping
//!
//! The stitcher page lives at `/document-stitcher`: `GET` shows the selected
//! documents and the statuses they can be merged into, `POST` runs the merge
//! and redirects to the generated document.

/// Request handlers
pub mod handlers;

use crate::{
    core::{generator::DocumentGenerator, token::MultiRequestProtection},
    errors::Error,
};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared data available to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all document operations
    pub database: DatabaseConnection,
    /// Store of already-used form tokens
    pub tokens: Arc<dyn MultiRequestProtection>,
    /// Service that builds merged documents
    pub generator: Arc<dyn DocumentGenerator>,
}

impl AppState {
    /// Creates the state shared by all handlers
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        tokens: Arc<dyn MultiRequestProtection>,
        generator: Arc<dyn DocumentGenerator>,
    ) -> Self {
        Self {
            database,
            tokens,
            generator,
        }
    }
}

/// Infrastructure failure surfaced as `500 Internal Server Error`
#[derive(Debug)]
pub struct ApiError(Error);

impl<E> From<E> for ApiError
where
    E: Into<Error>,
{
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Builds the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/document-stitcher",
            get(handlers::show_stitcher).post(handlers::stitch_documents),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
