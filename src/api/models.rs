//! Request models for the HTTP API
//!
//! The boundary converts relative durations (seconds from now) into
//! absolute unix-second timestamps exactly once, before anything reaches
//! the lifecycle engine.

use serde::Deserialize;

use crate::domain::{AlarmClass, AlarmEvent};
use crate::error::{invalid_input, AlarmError, Result};

/// Query parameters for `/api/raiseAlarm`.
#[derive(Debug, Deserialize)]
pub struct RaiseAlarmParams {
    pub alarm_id: Option<String>,
    pub alarm_class: Option<i32>,
    /// Displayed condition, defaults to "on"
    pub alarm_state: Option<String>,
    /// Whether the alarm must be acknowledged, defaults to false
    pub req_ack: Option<bool>,
    /// Seconds until automatic deletion (0 = never)
    pub duration: Option<i64>,
    /// Seconds until transition to class 1 (0 = none)
    pub delay_class_1: Option<i64>,
    /// Seconds until transition to class 2 (0 = none)
    pub delay_class_2: Option<i64>,
    /// Seconds until transition to class 3 (0 = none)
    pub delay_class_3: Option<i64>,
}

impl RaiseAlarmParams {
    /// Validate and convert into an engine event raised at `now`.
    pub fn into_event(self, now: i64) -> Result<AlarmEvent> {
        let alarm_id = require_id(self.alarm_id)?;

        let class_number = self
            .alarm_class
            .ok_or_else(|| invalid_input("'alarm_class' is required"))?;
        let alarm_class = AlarmClass::try_from(class_number).map_err(AlarmError::InvalidInput)?;

        Ok(AlarmEvent {
            alarm_id,
            alarm_class,
            alarm_state: self.alarm_state.unwrap_or_else(|| "on".to_string()),
            require_ack: self.req_ack.unwrap_or(false),
            raised_time: now,
            delete_time: seconds_from_now(self.duration, now, "duration")?,
            class_1_time: seconds_from_now(self.delay_class_1, now, "delay_class_1")?,
            class_2_time: seconds_from_now(self.delay_class_2, now, "delay_class_2")?,
            class_3_time: seconds_from_now(self.delay_class_3, now, "delay_class_3")?,
        })
    }
}

/// Query parameters for `/api/ackAlarm` and `/api/clearAlarm`.
#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub alarm_id: Option<String>,
}

/// Query parameters for `/api/getAlarms`.
#[derive(Debug, Default, Deserialize)]
pub struct GetAlarmsParams {
    pub alarm_id: Option<String>,
    pub before: Option<i64>,
    pub after: Option<i64>,
}

pub fn require_id(alarm_id: Option<String>) -> Result<String> {
    match alarm_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(invalid_input("'alarm_id' is required")),
    }
}

fn seconds_from_now(delay: Option<i64>, now: i64, field: &str) -> Result<Option<i64>> {
    match delay {
        None | Some(0) => Ok(None),
        Some(seconds) if seconds > 0 => Ok(Some(now + seconds)),
        Some(_) => Err(invalid_input(&format!("'{}' must not be negative", field))),
    }
}
