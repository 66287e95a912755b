use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::audit::AuditLog;
use crate::models::token::{IssuedToken, Token};
use crate::AppState;

// ── Request DTOs ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateParams {
    pub old_token: String,
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /tokens?userId= — issue a new token; the raw secret appears in
/// this response and nowhere else.
pub async fn generate_token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<IssuedToken>, AppError> {
    tracing::info!("Received request: Generate token for user '{}'", params.user_id);
    let issued = state.service.generate(&params.user_id).await?;
    Ok(Json(issued))
}

/// POST /tokens/rotate?oldToken= — retire the supplied token and return
/// its replacement.
pub async fn rotate_token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RotateParams>,
) -> Result<Json<IssuedToken>, AppError> {
    tracing::info!("Received request: Rotate token");
    let issued = state.service.rotate(&params.old_token).await?;
    Ok(Json(issued))
}

/// GET /tokens?userId= — all tokens for a user, active and retired.
pub async fn list_tokens(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<Vec<Token>>, AppError> {
    tracing::info!("Received request: List tokens for user '{}'", params.user_id);
    let tokens = state.service.list_tokens(&params.user_id).await?;
    Ok(Json(tokens))
}

/// GET /tokens/active?userId= — only the active tokens.
pub async fn list_active_tokens(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<Vec<Token>>, AppError> {
    tracing::info!(
        "Received request: List ACTIVE tokens for user '{}'",
        params.user_id
    );
    let tokens = state.service.list_active_tokens(&params.user_id).await?;
    Ok(Json(tokens))
}

/// DELETE /tokens/{tokenValue} — invalidate by raw token value.
pub async fn invalidate_token(
    State(state): State<Arc<AppState>>,
    Path(token_value): Path<String>,
) -> Result<StatusCode, AppError> {
    tracing::info!("Received request: Invalidate token");
    state.service.invalidate(&token_value).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auditlogs?userId= — the append-only trail for a user.
pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<Vec<AuditLog>>, AppError> {
    tracing::info!("Fetching audit logs for user '{}'", params.user_id);
    let logs = state.audit.find_by_user(&params.user_id).await?;
    Ok(Json(logs))
}

pub async fn readiness_check() -> &'static str {
    "ok"
}
