pub mod handlers;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// One route per lifecycle operation, plus the audit read path.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/tokens",
            post(handlers::generate_token).get(handlers::list_tokens),
        )
        .route("/tokens/rotate", post(handlers::rotate_token))
        .route("/tokens/active", get(handlers::list_active_tokens))
        .route("/tokens/:token_value", delete(handlers::invalidate_token))
        .route("/auditlogs", get(handlers::list_audit_logs))
        .route("/health", get(handlers::readiness_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
