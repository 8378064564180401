//! API routes configuration

use axum::{routing::get, Router};

use crate::api::handlers::*;
use crate::AppState;

/// Create API routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/serverTime", get(server_time))
        .route("/api/raiseAlarm", get(raise_alarm))
        .route("/api/ackAlarm", get(ack_alarm))
        .route("/api/clearAlarm", get(clear_alarm))
        .route("/api/getAlarms", get(get_alarms))
        .with_state(state)
}
