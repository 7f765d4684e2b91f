//! Document, letter-generation, and bulk-print traits.
//!
//! Letter **content** generation is an external concern; the engine only
//! assembles, measures, and routes the resulting PDFs.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::NotifyResult;
use crate::types::CaseId;

/// Trait for downloading case documents from the document store.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Download a document by its store URL.
    async fn download(&self, url: &str) -> NotifyResult<Bytes>;
}

/// Trait for cover-letter generation and PDF assembly.
#[async_trait]
pub trait PdfLetterService: Send + Sync + std::fmt::Debug + 'static {
    /// Generate a cover letter from a docmosis template and placeholders.
    async fn generate_letter(
        &self,
        template_id: &str,
        placeholders: &HashMap<String, String>,
    ) -> NotifyResult<Bytes>;

    /// Build the coversheet page for a recipient.
    async fn build_coversheet(&self, case_id: &CaseId, recipient: &str) -> NotifyResult<Bytes>;

    /// Number of pages in a PDF.
    fn page_count(&self, pdf: &[u8]) -> NotifyResult<usize>;

    /// Append a blank page when the PDF has an odd page count, so that
    /// concatenated sections start on a fresh sheet.
    fn pad_to_even_pages(&self, pdf: Bytes) -> NotifyResult<Bytes>;

    /// Concatenate two PDFs.
    fn merge(&self, first: Bytes, second: Bytes) -> NotifyResult<Bytes>;
}

/// Trait for the bulk-print channel used when a bundled letter exceeds the
/// provider's page limit.
#[async_trait]
pub trait BulkPrinter: Send + Sync + std::fmt::Debug + 'static {
    /// Submit documents for bulk printing to a named recipient.
    async fn bulk_print(
        &self,
        case_id: &CaseId,
        documents: Vec<Bytes>,
        recipient: &str,
    ) -> NotifyResult<()>;
}
