//! Alarm service
//!
//! Composes the store, the lifecycle engine and the notifier, and enforces
//! the single-writer-per-id discipline: every get/decide/upsert sequence on
//! one alarm_id runs under that id's lock, whether it came from the API
//! path or from a scheduler tick. Store-wide reads run lock-free.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::lifecycle;
use crate::domain::{Alarm, AlarmClass, AlarmEvent, ClearAction};
use crate::error::Result;
use crate::services::notifier::{AlarmNotification, Notifier};
use crate::store::{AlarmFilter, AlarmStore};

pub struct AlarmService {
    store: Arc<AlarmStore>,
    notifier: Arc<Notifier>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AlarmService {
    pub fn new(store: Arc<AlarmStore>, notifier: Arc<Notifier>) -> Self {
        Self {
            store,
            notifier,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<AlarmStore> {
        &self.store
    }

    fn id_lock(&self, alarm_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(alarm_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Raise an alarm: merge the event into the current record and notify
    /// when the merge asks for it. Duplicate raises are rejected without
    /// touching the store.
    pub async fn raise(&self, event: AlarmEvent) -> Result<Alarm> {
        let lock = self.id_lock(&event.alarm_id);

        let (alarm, notify) = {
            let _guard = lock.lock().await;
            let existing = self.store.get(&event.alarm_id).await?;
            let outcome = lifecycle::raise(existing.as_ref(), event)?;
            self.store.upsert(&outcome.alarm).await?;
            (outcome.alarm, outcome.notify)
        };

        info!(
            "Raised alarm {} (class {:?}, state '{}')",
            alarm.alarm_id, alarm.alarm_class, alarm.alarm_state
        );

        if notify {
            self.send_notification(&alarm).await;
        }

        Ok(alarm)
    }

    /// Acknowledge an alarm. Unknown ids and alarms that never required
    /// acknowledgment succeed idempotently; `None` means no such record.
    pub async fn acknowledge(&self, alarm_id: &str) -> Result<Option<Alarm>> {
        let lock = self.id_lock(alarm_id);
        let _guard = lock.lock().await;

        let Some(alarm) = self.store.get(alarm_id).await? else {
            return Ok(None);
        };

        match lifecycle::acknowledge(&alarm) {
            Some(acked) => {
                self.store.upsert(&acked).await?;
                info!("Acknowledged alarm {}", alarm_id);
                Ok(Some(acked))
            }
            None => Ok(Some(alarm)),
        }
    }

    /// Clear an alarm. Unacknowledged alarms get a deferred deletion
    /// instead of being removed; unknown ids succeed idempotently. Returns
    /// whether the record was deleted right away.
    pub async fn clear(&self, alarm_id: &str, now: i64) -> Result<bool> {
        let lock = self.id_lock(alarm_id);
        let _guard = lock.lock().await;

        let Some(alarm) = self.store.get(alarm_id).await? else {
            return Ok(false);
        };

        match lifecycle::clear_action(&alarm, now) {
            ClearAction::DeleteNow => {
                self.store.delete(alarm_id).await?;
                info!("Cleared alarm {}", alarm_id);
                Ok(true)
            }
            ClearAction::DeferUntil(delete_time) => {
                let mut deferred = alarm;
                deferred.delete_time = Some(delete_time);
                self.store.upsert(&deferred).await?;
                info!(
                    "Deferred clearing of unacknowledged alarm {} until ack",
                    alarm_id
                );
                Ok(false)
            }
        }
    }

    /// Filtered listing, newest raised first.
    pub async fn list(&self, filter: &AlarmFilter) -> Result<Vec<Alarm>> {
        self.store.query(filter).await
    }

    /// One scheduler tick: delete expired records, then apply due class
    /// transitions. Per-record storage errors are logged and the tick moves
    /// on to the next record.
    pub async fn tick(&self, now: i64) -> Result<()> {
        for candidate in self.store.scan_due_deletions(now).await? {
            let lock = self.id_lock(&candidate.alarm_id);
            let _guard = lock.lock().await;

            // Re-read under the lock: the record may have changed since the scan.
            match self.store.get(&candidate.alarm_id).await {
                Ok(Some(alarm)) if lifecycle::expire(&alarm, now) => {
                    match self.store.delete(&alarm.alarm_id).await {
                        Ok(_) => info!("Deleted expired alarm {}", alarm.alarm_id),
                        Err(e) => error!("Failed to delete alarm {}: {}", alarm.alarm_id, e),
                    }
                }
                Ok(_) => {}
                Err(e) => error!("Failed to re-read alarm {}: {}", candidate.alarm_id, e),
            }
        }

        for candidate in self.store.scan_due_transitions(now).await? {
            let lock = self.id_lock(&candidate.alarm_id);

            let notify_target = {
                let _guard = lock.lock().await;
                match self.store.get(&candidate.alarm_id).await {
                    Ok(Some(alarm)) => match lifecycle::apply_due_transitions(&alarm, now) {
                        Some(outcome) => match self.store.upsert(&outcome.alarm).await {
                            Ok(()) => {
                                if let Some(new_class) = outcome.changed {
                                    info!(
                                        "Alarm {} transitioned to class {:?}",
                                        outcome.alarm.alarm_id, new_class
                                    );
                                }
                                outcome
                                    .changed
                                    .filter(|class| class.notifies())
                                    .map(|_| outcome.alarm)
                            }
                            Err(e) => {
                                error!(
                                    "Failed to persist transition for {}: {}",
                                    candidate.alarm_id, e
                                );
                                None
                            }
                        },
                        None => None,
                    },
                    Ok(None) => None,
                    Err(e) => {
                        error!("Failed to re-read alarm {}: {}", candidate.alarm_id, e);
                        None
                    }
                }
            };

            if let Some(alarm) = notify_target {
                self.send_notification(&alarm).await;
            }
        }

        Ok(())
    }

    /// Recompute the class totals and fan out. Failures on this path are
    /// contained: a notification is never worth failing the operation that
    /// triggered it.
    async fn send_notification(&self, alarm: &Alarm) {
        let alarm_count = match self.store.count_class(AlarmClass::Alarm).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Skipping notification, failed to count alarms: {}", e);
                return;
            }
        };
        let warning_count = match self.store.count_class(AlarmClass::Warning).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Skipping notification, failed to count warnings: {}", e);
                return;
            }
        };

        let notification = AlarmNotification {
            alarm_id: alarm.alarm_id.clone(),
            alarm_state: alarm.alarm_state.clone(),
            alarm_class: alarm.alarm_class,
            alarm_count,
            warning_count,
        };

        self.notifier.notify(&notification).await;
    }
}
