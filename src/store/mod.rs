//! SQLite persistence layer

pub mod alarm_store;
pub mod client;

pub use alarm_store::{AlarmFilter, AlarmStore};
pub use client::SqliteClient;
