//! AlarmWatcher backend
//!
//! Alarm lifecycle engine with a durable SQLite store, a periodic
//! transition/deletion scheduler and best-effort notification fan-out.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use domain::{Alarm, AlarmClass, AlarmEvent};
pub use error::{AlarmError, Result};
pub use services::{AlarmService, LifecycleScheduler, LogSink, NotificationSink, Notifier};
pub use store::{AlarmFilter, AlarmStore, SqliteClient};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: std::sync::Arc<AppConfig>,
    pub service: std::sync::Arc<AlarmService>,
}
