//! Alarm record types

use serde::{Deserialize, Serialize};

/// Alarm severity class. Lower number means higher priority, so the derived
/// ordering (`Alarm < Warning < Event`) compares priority directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum AlarmClass {
    /// Class 1 - highest priority
    Alarm = 1,
    /// Class 2 - medium priority
    Warning = 2,
    /// Class 3 - lowest priority, informational
    Event = 3,
}

impl AlarmClass {
    /// Whether a class change to this class triggers a notification.
    /// Events (class 3) never notify.
    pub fn notifies(self) -> bool {
        matches!(self, AlarmClass::Alarm | AlarmClass::Warning)
    }
}

impl From<AlarmClass> for i32 {
    fn from(class: AlarmClass) -> i32 {
        class as i32
    }
}

impl TryFrom<i32> for AlarmClass {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AlarmClass::Alarm),
            2 => Ok(AlarmClass::Warning),
            3 => Ok(AlarmClass::Event),
            other => Err(format!("alarm_class must be 1, 2 or 3, got {}", other)),
        }
    }
}

/// One alarm row. All timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Alarm {
    /// Unique identifier, immutable once created
    pub alarm_id: String,
    /// Current displayed severity
    pub alarm_class: AlarmClass,
    /// Free-form condition string (e.g. "active", "fault")
    pub alarm_state: String,
    /// When the currently displayed state was raised
    pub raised_time: i64,
    /// Whether a human must acknowledge before the alarm can be
    /// superseded or deleted silently
    pub require_ack: bool,
    /// Scheduled deletion, gated on `require_ack` being cleared
    pub delete_time: Option<i64>,
    /// Scheduled transition to class 1
    pub class_1_time: Option<i64>,
    /// Scheduled transition to class 2
    pub class_2_time: Option<i64>,
    /// Scheduled transition to class 3
    pub class_3_time: Option<i64>,
    /// Staged raised_time of a lower-priority update awaiting acknowledgment
    pub time_after_ack: Option<i64>,
    /// Staged class of a lower-priority update awaiting acknowledgment
    pub class_after_ack: Option<AlarmClass>,
    /// Staged state of a lower-priority update awaiting acknowledgment
    pub state_after_ack: Option<String>,
}

/// An incoming raise request after boundary conversion: all durations and
/// delays have already been turned into absolute unix-second timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub alarm_id: String,
    pub alarm_class: AlarmClass,
    pub alarm_state: String,
    pub require_ack: bool,
    pub raised_time: i64,
    pub delete_time: Option<i64>,
    pub class_1_time: Option<i64>,
    pub class_2_time: Option<i64>,
    pub class_3_time: Option<i64>,
}

impl From<AlarmEvent> for Alarm {
    /// Insert-as-new: the event becomes the record, nothing staged.
    fn from(event: AlarmEvent) -> Self {
        Alarm {
            alarm_id: event.alarm_id,
            alarm_class: event.alarm_class,
            alarm_state: event.alarm_state,
            raised_time: event.raised_time,
            require_ack: event.require_ack,
            delete_time: event.delete_time,
            class_1_time: event.class_1_time,
            class_2_time: event.class_2_time,
            class_3_time: event.class_3_time,
            time_after_ack: None,
            class_after_ack: None,
            state_after_ack: None,
        }
    }
}
