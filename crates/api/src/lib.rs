//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Group balance and settlement endpoint
//! - Group statistics endpoint
//! - Health check
//! - Error to response mapping

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use potluck_core::currency::CurrencyNormalizer;
use potluck_store::JsonStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Group and expense store.
    pub store: Arc<JsonStore>,
    /// Currency normalizer with its rate cache.
    pub normalizer: Arc<CurrencyNormalizer>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
