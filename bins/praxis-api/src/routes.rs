use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/problems/:id/run", post(handlers::run_code))
        .route("/problems/:id/submit", post(handlers::submit_code))
        .route("/status", get(handlers::health_check))
}
