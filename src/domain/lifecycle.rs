//! Alarm lifecycle engine
//!
//! Pure decision logic: how a new or repeated alarm event merges into
//! existing state, how scheduled class transitions and deletions are
//! applied, and when each of those triggers a notification. Every function
//! takes the current record by reference and returns a replacement value;
//! persistence is the caller's concern.

use crate::domain::alarm::{Alarm, AlarmClass, AlarmEvent};
use crate::error::AlarmError;

/// Result of merging a raise event into the store.
#[derive(Debug, Clone)]
pub struct RaiseOutcome {
    /// The record to persist
    pub alarm: Alarm,
    /// Whether a notification is due for the displayed class
    pub notify: bool,
}

/// Result of applying a due scheduled transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The record to persist (due slot cleared, class possibly updated)
    pub alarm: Alarm,
    /// The new class, when the transition actually changed it
    pub changed: Option<AlarmClass>,
}

/// What a clear request should do to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearAction {
    /// Delete the record immediately
    DeleteNow,
    /// Keep the record and schedule deletion; the scheduler deletes it
    /// once the alarm has been acknowledged
    DeferUntil(i64),
}

/// A scheduled slot is replaced by the incoming value when the incoming
/// value is set or the existing slot is empty. A populated existing slot
/// survives a raise that supplies nothing for it.
fn merge_slot(existing: Option<i64>, incoming: Option<i64>) -> Option<i64> {
    if incoming.is_some() || existing.is_none() {
        incoming
    } else {
        existing
    }
}

/// Merge a raise event into the existing record (if any).
///
/// A repeated raise with the same class and state as the displayed record
/// is rejected without producing a new record, so repeated identical raises
/// cannot cause notification storms.
pub fn raise(existing: Option<&Alarm>, event: AlarmEvent) -> Result<RaiseOutcome, AlarmError> {
    let Some(current) = existing else {
        let notify = event.alarm_class.notifies();
        return Ok(RaiseOutcome {
            alarm: Alarm::from(event),
            notify,
        });
    };

    if current.alarm_class == event.alarm_class && current.alarm_state == event.alarm_state {
        return Err(AlarmError::DuplicateAlarm(event.alarm_id));
    }

    let mut alarm = current.clone();
    alarm.class_1_time = merge_slot(current.class_1_time, event.class_1_time);
    alarm.class_2_time = merge_slot(current.class_2_time, event.class_2_time);
    alarm.class_3_time = merge_slot(current.class_3_time, event.class_3_time);

    let notify = if !current.require_ack {
        // Nothing pending acknowledgment: the event replaces the record.
        alarm.alarm_class = event.alarm_class;
        alarm.alarm_state = event.alarm_state;
        alarm.raised_time = event.raised_time;
        alarm.require_ack = event.require_ack;
        alarm.delete_time = event.delete_time;
        event.alarm_class.notifies()
    } else if event.alarm_class < current.alarm_class {
        // Higher priority: promote in place. The original unacknowledged
        // event is still the one pending ack, so require_ack and
        // raised_time stay untouched.
        alarm.alarm_class = event.alarm_class;
        alarm.alarm_state = event.alarm_state;
        alarm.delete_time = event.delete_time;
        event.alarm_class.notifies()
    } else if event.alarm_class > current.alarm_class {
        // Lower priority: stage behind the pending alarm. Becomes visible
        // only on acknowledgment, so no notification yet.
        alarm.time_after_ack = Some(event.raised_time);
        alarm.class_after_ack = Some(event.alarm_class);
        alarm.state_after_ack = Some(event.alarm_state);
        alarm.delete_time = event.delete_time;
        false
    } else {
        // Same severity, refreshed details. No class change, no duplicate
        // notification.
        alarm.alarm_state = event.alarm_state;
        alarm.delete_time = event.delete_time;
        false
    };

    Ok(RaiseOutcome { alarm, notify })
}

/// Acknowledge a record. Returns `None` when the record does not require
/// acknowledgment (no-op). When a staged lower-priority update is present
/// it is revealed atomically.
pub fn acknowledge(alarm: &Alarm) -> Option<Alarm> {
    if !alarm.require_ack {
        return None;
    }

    let mut acked = alarm.clone();
    acked.require_ack = false;

    if let (Some(time), Some(class), Some(state)) = (
        alarm.time_after_ack,
        alarm.class_after_ack,
        alarm.state_after_ack.clone(),
    ) {
        acked.raised_time = time;
        acked.alarm_class = class;
        acked.alarm_state = state;
        acked.time_after_ack = None;
        acked.class_after_ack = None;
        acked.state_after_ack = None;
    }

    Some(acked)
}

/// Decide how a clear request applies to an existing record. Unacknowledged
/// alarms are never deleted directly; deletion is deferred until the
/// scheduler's gate is satisfied.
pub fn clear_action(alarm: &Alarm, now: i64) -> ClearAction {
    if alarm.require_ack {
        ClearAction::DeferUntil(now)
    } else {
        ClearAction::DeleteNow
    }
}

/// Apply at most one due scheduled class transition. Slots are checked in
/// class order 1, 2, 3, so when several are due at once the lowest class
/// number wins. The winning slot is cleared even when the class does not
/// change; `changed` is set only on an actual class change.
///
/// This path writes the class directly: time elapsing on an accepted alarm
/// is not a new incoming event, so the raise merge/staging rules do not
/// apply here.
pub fn apply_due_transitions(alarm: &Alarm, now: i64) -> Option<TransitionOutcome> {
    let slots = [
        (AlarmClass::Alarm, alarm.class_1_time),
        (AlarmClass::Warning, alarm.class_2_time),
        (AlarmClass::Event, alarm.class_3_time),
    ];

    let (target, _) = slots
        .into_iter()
        .find(|(_, slot)| matches!(slot, Some(due) if *due <= now))?;

    let mut updated = alarm.clone();
    match target {
        AlarmClass::Alarm => updated.class_1_time = None,
        AlarmClass::Warning => updated.class_2_time = None,
        AlarmClass::Event => updated.class_3_time = None,
    }

    let changed = if target != alarm.alarm_class {
        updated.alarm_class = target;
        Some(target)
    } else {
        None
    };

    Some(TransitionOutcome {
        alarm: updated,
        changed,
    })
}

/// Whether a record is due for deletion: `delete_time` has elapsed and the
/// acknowledgment gate is satisfied.
pub fn expire(alarm: &Alarm, now: i64) -> bool {
    !alarm.require_ack && matches!(alarm.delete_time, Some(due) if due <= now)
}
