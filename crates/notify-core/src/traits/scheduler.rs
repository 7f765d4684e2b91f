//! External job scheduler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::NotifyResult;
use crate::types::EventId;

/// Trait for the external one-shot job scheduler.
///
/// Jobs grouped under the same key collapse into one scheduling group on
/// the queue side. Delivery is at-least-once; every payload must be
/// self-contained enough to reconstruct the dispatch request when it fires.
/// Nothing in this subsystem retracts a scheduled job.
#[async_trait]
pub trait JobScheduler: Send + Sync + std::fmt::Debug + 'static {
    /// Enqueue a job to fire at the given time.
    async fn schedule(
        &self,
        group_key: &str,
        event_id: &EventId,
        payload: serde_json::Value,
        fire_at: DateTime<Utc>,
    ) -> NotifyResult<()>;
}
