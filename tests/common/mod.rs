//! Common test utilities and helpers

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use alarmwatcher::services::notifier::AlarmNotification;
use alarmwatcher::store::AlarmStore;
use alarmwatcher::{
    api::routes, AlarmClass, AlarmEvent, AlarmService, AppConfig, AppState, NotificationSink,
    Notifier, SqliteClient,
};

/// Sink that records every delivered notification for assertions.
#[derive(Default)]
pub struct CollectingSink {
    delivered: Mutex<Vec<AlarmNotification>>,
}

impl CollectingSink {
    pub fn delivered(&self) -> Vec<AlarmNotification> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for CollectingSink {
    fn name(&self) -> &str {
        "collecting"
    }

    async fn deliver(&self, notification: &AlarmNotification) -> anyhow::Result<()> {
        self.delivered.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Sink that always fails, for containment tests.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn deliver(&self, _notification: &AlarmNotification) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("delivery refused"))
    }
}

/// Service over an in-memory database with a collecting sink registered.
pub async fn create_test_service() -> (Arc<AlarmService>, Arc<CollectingSink>) {
    let client = SqliteClient::in_memory().await.unwrap();
    let store = Arc::new(AlarmStore::new(&client));
    store.init_schema().await.unwrap();

    let sink = Arc::new(CollectingSink::default());
    let notifier = Arc::new(Notifier::new());
    notifier.subscribe(sink.clone()).await;

    (Arc::new(AlarmService::new(store, notifier)), sink)
}

/// App state plus router for API tests.
pub async fn create_test_router() -> (axum::Router, Arc<CollectingSink>) {
    let (service, sink) = create_test_service().await;
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        service,
    };
    (routes::create_router(state), sink)
}

/// Minimal raise event: no ack requirement, no schedules.
pub fn event(id: &str, class: AlarmClass, state: &str, raised_time: i64) -> AlarmEvent {
    AlarmEvent {
        alarm_id: id.to_string(),
        alarm_class: class,
        alarm_state: state.to_string(),
        require_ack: false,
        raised_time,
        delete_time: None,
        class_1_time: None,
        class_2_time: None,
        class_3_time: None,
    }
}
