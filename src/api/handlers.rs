//! HTTP handlers
//!
//! Thin layer over the alarm service: validate, convert at the boundary,
//! delegate. No lifecycle logic here.

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::models::{require_id, GetAlarmsParams, IdParams, RaiseAlarmParams};
use crate::domain::Alarm;
use crate::error::Result;
use crate::store::AlarmFilter;
use crate::AppState;

/// Service liveness.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "alarmwatcher",
        "version": env!("CARGO_PKG_VERSION"),
        "scheduler_tick_secs": state.config.scheduler.tick_interval_secs,
    }))
}

/// Current server time as a unix timestamp, plain text.
pub async fn server_time() -> String {
    Utc::now().timestamp().to_string()
}

/// Raise (or merge) an alarm.
pub async fn raise_alarm(
    State(state): State<AppState>,
    Query(params): Query<RaiseAlarmParams>,
) -> Result<Json<Alarm>> {
    let now = Utc::now().timestamp();
    let event = params.into_event(now)?;
    let alarm = state.service.raise(event).await?;
    Ok(Json(alarm))
}

/// Acknowledge an alarm. Unknown ids succeed idempotently.
pub async fn ack_alarm(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Value>> {
    let alarm_id = require_id(params.alarm_id)?;
    state.service.acknowledge(&alarm_id).await?;
    Ok(Json(json!({
        "alarm_id": alarm_id,
        "status": "acknowledged"
    })))
}

/// Clear an alarm. Unknown ids succeed idempotently; unacknowledged alarms
/// are scheduled for deletion instead of removed.
pub async fn clear_alarm(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Value>> {
    let alarm_id = require_id(params.alarm_id)?;
    let now = Utc::now().timestamp();
    let deleted = state.service.clear(&alarm_id, now).await?;
    Ok(Json(json!({
        "alarm_id": alarm_id,
        "status": if deleted { "cleared" } else { "clear_pending" }
    })))
}

/// List alarms, newest raised first, with optional id/before/after filters.
pub async fn get_alarms(
    State(state): State<AppState>,
    Query(params): Query<GetAlarmsParams>,
) -> Result<Json<Vec<Alarm>>> {
    let filter = AlarmFilter {
        alarm_id: params.alarm_id,
        raised_before: params.before,
        raised_after: params.after,
    };
    let alarms = state.service.list(&filter).await?;
    Ok(Json(alarms))
}
