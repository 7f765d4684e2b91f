//! Scheduler job payloads.

use serde::{Deserialize, Serialize};

use notify_core::types::{CaseId, EventId};

/// Payload of a deferred or re-scheduled notification job.
///
/// `retry` is 0 on jobs that must never re-enter the retry path (deferred
/// deliveries scheduled before any send was attempted carry 1; a 0 means
/// retrying is disabled for the job).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendPayload {
    pub case_id: CaseId,
    pub event_id: EventId,
    pub retry: u32,
}

impl ResendPayload {
    pub fn new(case_id: CaseId, event_id: EventId, retry: u32) -> Self {
        Self {
            case_id,
            event_id,
            retry,
        }
    }

    /// Scheduler group key. Jobs for the same case event replace each
    /// other rather than stacking.
    pub fn group_key(&self) -> String {
        format!("{}:{}", self.case_id, self.event_id)
    }
}
