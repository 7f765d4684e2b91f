//! Collaborator traits.
//!
//! The engine owns no wire surface of its own; every external system it
//! touches is reached through one of these seams. Implementations live in
//! the embedding service (or in test doubles).

pub mod documents;
pub mod markdown;
pub mod provider;
pub mod scheduler;

pub use documents::{BulkPrinter, DocumentStore, PdfLetterService};
pub use markdown::MarkdownRenderer;
pub use provider::{ProviderClient, ProviderFailure, ProviderReceipt};
pub use scheduler::JobScheduler;
