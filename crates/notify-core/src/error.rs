//! Unified application error types for Tribunal Notify.
//!
//! All crates map their internal errors into [`NotifyError`] for consistent
//! propagation through the ? operator. Channel-level delivery failures are
//! classified separately before they reach this boundary; only the cases the
//! orchestrator's caller must observe are converted into a `NotifyError`.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input or case-state validation failed.
    Validation,
    /// The case data is unusable for the requested channel (e.g. an
    /// incomplete postal address). Terminal, never retried.
    DataQuality,
    /// A network-level failure reaching the delivery provider (host
    /// resolution, connection refused). Fatal to the current attempt and
    /// never rescheduled by this layer.
    TransientNetwork,
    /// The delivery provider rejected the request.
    Provider,
    /// The retry budget for a notification has been exhausted.
    RetryExhausted,
    /// A job could not be handed to the external scheduler.
    Scheduling,
    /// A document could not be downloaded, generated, or merged.
    Document,
    /// A correspondence audit record could not be written.
    Correspondence,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::DataQuality => write!(f, "DATA_QUALITY"),
            Self::TransientNetwork => write!(f, "TRANSIENT_NETWORK"),
            Self::Provider => write!(f, "PROVIDER"),
            Self::RetryExhausted => write!(f, "RETRY_EXHAUSTED"),
            Self::Scheduling => write!(f, "SCHEDULING"),
            Self::Document => write!(f, "DOCUMENT"),
            Self::Correspondence => write!(f, "CORRESPONDENCE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Tribunal Notify.
///
/// All crate-specific errors are mapped into `NotifyError` using `From`
/// impls or explicit `.map_err()` calls. This provides a single error type
/// for the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct NotifyError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl NotifyError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a data-quality error.
    pub fn data_quality(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataQuality, message)
    }

    /// Create a transient-network error.
    pub fn transient_network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransientNetwork, message)
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Provider, message)
    }

    /// Create a retry-exhausted error.
    pub fn retry_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RetryExhausted, message)
    }

    /// Create a scheduling error.
    pub fn scheduling(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Scheduling, message)
    }

    /// Create a document error.
    pub fn document(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Document, message)
    }

    /// Create a correspondence error.
    pub fn correspondence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Correspondence, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for NotifyError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for NotifyError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
