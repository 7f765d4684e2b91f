//! Notification provider client trait.
//!
//! One implementation wraps the production credential set, another the test
//! credential set; the gateway chooses between them per recipient.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::types::CaseId;

/// Receipt returned by the provider for an accepted send.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProviderReceipt {
    /// Provider-assigned notification identifier.
    pub notification_id: Uuid,
    /// Rendered message body, when the provider echoes it back.
    pub body: Option<String>,
    /// Rendered subject line (email only).
    pub subject: Option<String>,
    /// Sender address or number the provider used.
    pub from: Option<String>,
}

/// Failure of a single provider call.
///
/// The two variants drive the retry classification: a network failure is
/// fatal to the current attempt and never rescheduled by this layer, while
/// a rejection carries the provider's HTTP-equivalent status code and may
/// be retryable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderFailure {
    /// Host resolution or connection failure before the provider answered.
    #[error("network failure reaching provider: {0}")]
    Network(String),
    /// The provider answered with a non-success status.
    #[error("provider rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP-equivalent result code reported by the provider.
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },
}

/// Trait for the external notification provider.
#[async_trait]
pub trait ProviderClient: Send + Sync + std::fmt::Debug + 'static {
    /// Send a templated email.
    async fn send_email(
        &self,
        template_id: &str,
        to: &str,
        personalisation: &HashMap<String, String>,
        reference: &str,
    ) -> Result<ProviderReceipt, ProviderFailure>;

    /// Send a templated SMS.
    async fn send_sms(
        &self,
        template_id: &str,
        to: &str,
        personalisation: &HashMap<String, String>,
        reference: &str,
    ) -> Result<ProviderReceipt, ProviderFailure>;

    /// Send a templated letter. The provider resolves the address from the
    /// personalisation map's address-line placeholders.
    async fn send_letter(
        &self,
        template_id: &str,
        personalisation: &HashMap<String, String>,
        case_id: &CaseId,
    ) -> Result<ProviderReceipt, ProviderFailure>;

    /// Submit a precompiled (bundled) letter PDF.
    async fn send_precompiled_letter(
        &self,
        case_id: &CaseId,
        pdf: Bytes,
    ) -> Result<ProviderReceipt, ProviderFailure>;
}
