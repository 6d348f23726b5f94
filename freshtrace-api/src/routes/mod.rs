//! API route handlers

pub mod health;
pub mod product;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

/// Body limit: the 5 MiB image bound plus multipart framing overhead
const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        // Product endpoints
        .route("/api/v1/products", post(product::create_product))
        .route("/api/v1/products/:product_id", get(product::get_product))
        .route("/api/v1/products/:product_id/logs", post(product::add_log))
        .route(
            "/api/v1/products/:product_id/image",
            post(product::analyze_with_image),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // State
        .with_state(state)
}
