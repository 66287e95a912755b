//! Tokend — library crate for integration testing.
//!
//! Re-exports the modules needed by the tests in `tests/`.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod hasher;
pub mod models;
pub mod service;
pub mod store;

use std::sync::Arc;

use service::TokenService;
use store::AuditTrail;

/// Shared application state passed to handlers.
pub struct AppState {
    pub service: TokenService,
    pub audit: Arc<dyn AuditTrail>,
}
