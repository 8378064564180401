//! Notification summary and fan-out
//!
//! The engine side computes a human-readable summary (triggering alarm plus
//! the current class-1/class-2 totals) and hands it to every registered
//! sink. Delivery is best-effort: a failing sink is logged and skipped,
//! never surfaced to the caller. Transport (push services, webhooks, ...)
//! lives behind [`NotificationSink`].

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::AlarmClass;

/// One rendered notification.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmNotification {
    /// Triggering alarm id
    pub alarm_id: String,
    /// Its displayed state
    pub alarm_state: String,
    /// Resulting class (1 or 2; class 3 never reaches the notifier)
    pub alarm_class: AlarmClass,
    /// Current count of class-1 records
    pub alarm_count: i64,
    /// Current count of class-2 records
    pub warning_count: i64,
}

impl AlarmNotification {
    pub fn title(&self) -> String {
        let kind = match self.alarm_class {
            AlarmClass::Warning => "warning",
            _ => "alarm",
        };
        format!("AlarmWatcher - New {}!", kind)
    }

    pub fn body(&self) -> String {
        format!(
            "{} is {}!\n> alarms: {}  > warnings: {}",
            self.alarm_id, self.alarm_state, self.alarm_count, self.warning_count
        )
    }

    /// Wire payload for sinks that forward JSON.
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "title": self.title(),
            "body": self.body(),
        })
    }
}

/// Delivery transport seam.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, notification: &AlarmNotification) -> anyhow::Result<()>;
}

/// Fan-out to all registered sinks in parallel. No retry, no ordering
/// guarantee between sinks, no backpressure on the caller.
#[derive(Default)]
pub struct Notifier {
    sinks: RwLock<Vec<Arc<dyn NotificationSink>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, sink: Arc<dyn NotificationSink>) {
        let mut sinks = self.sinks.write().await;
        info!("Registered notification sink: {}", sink.name());
        sinks.push(sink);
    }

    pub async fn sink_count(&self) -> usize {
        self.sinks.read().await.len()
    }

    /// Deliver to every sink; failures are logged per sink and swallowed.
    pub async fn notify(&self, notification: &AlarmNotification) {
        let sinks = self.sinks.read().await.clone();

        let deliveries = sinks.iter().map(|sink| async move {
            (sink.name().to_string(), sink.deliver(notification).await)
        });

        for (name, result) in join_all(deliveries).await {
            if let Err(e) = result {
                warn!("Failed to deliver notification via {}: {}", name, e);
            }
        }
    }
}

/// Built-in sink that writes notifications to the log.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, notification: &AlarmNotification) -> anyhow::Result<()> {
        info!(
            title = %notification.title(),
            "{}",
            notification.body().replace('\n', " ")
        );
        Ok(())
    }
}
