//! API routes module.

mod firmware;
mod health;

use crate::AppState;
use axum::Router;
use std::sync::Arc;

/// Build the router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(firmware::router(state))
        .merge(health::router())
}
