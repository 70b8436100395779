//! Service layer.
//!
//! Services hold the notification pipeline logic and are wired together
//! once at startup by `AppState`.

pub mod notifications;

pub use notifications::{DispatchOutcome, NotificationDispatcher};
