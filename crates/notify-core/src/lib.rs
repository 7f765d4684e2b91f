//! # notify-core
//!
//! Core crate for Tribunal Notify. Contains collaborator traits,
//! configuration schemas, typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Tribunal Notify
//! crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, NotifyError};
pub use result::NotifyResult;
