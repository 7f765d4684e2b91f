//! In-memory scheduler.
//!
//! Backs local runs and tests. Jobs grouped under the same key replace
//! each other, matching the external queue's collapse semantics.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use notify_core::traits::JobScheduler;
use notify_core::types::EventId;
use notify_core::NotifyResult;

/// One enqueued job.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub group_key: String,
    pub event_id: EventId,
    pub payload: serde_json::Value,
    pub fire_at: DateTime<Utc>,
}

/// Scheduler keeping jobs in process memory.
#[derive(Debug, Default)]
pub struct InMemoryScheduler {
    jobs: Mutex<Vec<ScheduledJob>>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything currently enqueued.
    pub fn pending(&self) -> Vec<ScheduledJob> {
        self.jobs.lock().map(|jobs| jobs.clone()).unwrap_or_default()
    }

    /// Remove and return every job due at or before `now`.
    pub fn take_due(&self, now: DateTime<Utc>) -> Vec<ScheduledJob> {
        let Ok(mut jobs) = self.jobs.lock() else {
            return Vec::new();
        };
        let (due, pending): (Vec<_>, Vec<_>) =
            jobs.drain(..).partition(|job| job.fire_at <= now);
        *jobs = pending;
        due
    }
}

#[async_trait]
impl JobScheduler for InMemoryScheduler {
    async fn schedule(
        &self,
        group_key: &str,
        event_id: &EventId,
        payload: serde_json::Value,
        fire_at: DateTime<Utc>,
    ) -> NotifyResult<()> {
        let Ok(mut jobs) = self.jobs.lock() else {
            return Err(notify_core::NotifyError::scheduling(
                "scheduler lock poisoned",
            ));
        };
        jobs.retain(|job| job.group_key != group_key);
        jobs.push(ScheduledJob {
            group_key: group_key.to_owned(),
            event_id: *event_id,
            payload,
            fire_at,
        });
        Ok(())
    }
}
