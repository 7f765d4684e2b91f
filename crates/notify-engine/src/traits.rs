//! Domain-facing collaborator traits.
//!
//! These live here rather than in `notify-core` because their signatures
//! carry domain entities.

use async_trait::async_trait;

use notify_core::result::NotifyResult;
use notify_core::types::{CaseId, EventId};
use notify_entity::correspondence::Correspondence;
use notify_entity::event::CaseEventContext;
use notify_entity::notification::Notification;
use notify_entity::subscription::SubscriptionWithType;

/// Trait for the template resolution service that turns an (event,
/// recipient) pair into channel-agnostic notification content.
#[async_trait]
pub trait NotificationBuilder: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve templates and placeholder values for one recipient.
    async fn build(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
    ) -> NotifyResult<Notification>;
}

/// Trait for persisting correspondence audit records against the case.
#[async_trait]
pub trait CorrespondenceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append one audit record to the case.
    async fn save(&self, record: &Correspondence) -> NotifyResult<()>;
}

/// Trait for reloading an event context when a deferred or retried job
/// fires. The snapshot is re-read at fire time, so a job always acts on
/// current case data rather than the data captured when it was enqueued.
#[async_trait]
pub trait CaseEventSource: Send + Sync + std::fmt::Debug + 'static {
    /// Load the event and current case snapshot for a scheduled job.
    async fn load(&self, case_id: &CaseId, event_id: &EventId) -> NotifyResult<CaseEventContext>;
}
