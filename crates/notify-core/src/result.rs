//! Convenience result type alias for Tribunal Notify.

use crate::error::NotifyError;

/// A specialized `Result` type for Tribunal Notify operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, NotifyError>` explicitly.
pub type NotifyResult<T> = Result<T, NotifyError>;
