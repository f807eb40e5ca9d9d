//! HTTP surface of the service.
//!
//! A thin transport layer: handlers decode the request, hand it to an analysis
//! component under the request deadline, and encode the result.

pub mod error;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::runtime::Runtime;

/// Build the application router.
pub fn router(runtime: Runtime) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/analyze/email", post(handlers::analyze_email))
        .route("/analyze/batch", post(handlers::analyze_batch))
        .route("/ai/chat", post(handlers::chat))
        .route("/generate/reply", post(handlers::generate_reply))
        .route("/classify/email", post(handlers::classify_email))
        .route("/assess/priority", post(handlers::assess_priority))
        .route("/stats/summary", get(handlers::stats_summary))
        .with_state(runtime)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
