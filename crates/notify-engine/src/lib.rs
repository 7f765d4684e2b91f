//! # notify-engine
//!
//! The notification decision and delivery orchestration engine. An inbound
//! case event enters [`service::NotificationService`], passes the
//! eligibility gate, may be deferred outside the permitted delivery
//! window, is expanded into per-party recipients by the subscription
//! resolver, and is dispatched per channel with provider-failure
//! classification and bounded retry rescheduling.

pub mod delivery;
pub mod dispatch;
pub mod eligibility;
pub mod letters;
pub mod resolver;
pub mod sender;
pub mod service;
pub mod traits;
pub mod window;

pub use service::NotificationService;
