//! # notify-worker
//!
//! Re-entry side of the scheduler: when a deferred or retried job fires,
//! the handler reloads the current case data and hands the event back to
//! the engine with deferral checks disabled.

pub mod handler;
pub mod queue;

pub use handler::DeferredNotificationHandler;
pub use queue::InMemoryScheduler;
