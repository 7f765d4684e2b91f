//! # notify-entity
//!
//! Domain model for Tribunal Notify. Every struct in this crate is a value
//! object read from the case-management platform or assembled by the
//! engine; nothing here performs I/O. All entities derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize`.

pub mod case;
pub mod correspondence;
pub mod event;
pub mod job;
pub mod notification;
pub mod placeholders;
pub mod subscription;
