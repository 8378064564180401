//! Service layer: lifecycle orchestration, scheduling and notification

pub mod alarm_service;
pub mod notifier;
pub mod scheduler;

pub use alarm_service::AlarmService;
pub use notifier::{AlarmNotification, LogSink, NotificationSink, Notifier};
pub use scheduler::LifecycleScheduler;
