//! Domain types and the alarm lifecycle engine

pub mod alarm;
pub mod lifecycle;

pub use alarm::{Alarm, AlarmClass, AlarmEvent};
pub use lifecycle::{ClearAction, RaiseOutcome, TransitionOutcome};
