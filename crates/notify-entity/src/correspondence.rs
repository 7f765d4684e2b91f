//! Correspondence audit records.
//!
//! One entry per delivered notification, written best-effort to the case
//! after a provider accepts a send.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notify_core::types::{CaseId, EventId};

use crate::notification::Channel;

/// Audit record of a single accepted delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correspondence {
    pub case_id: CaseId,
    pub event_id: EventId,
    /// Provider-assigned id of the accepted notification.
    pub notification_id: Uuid,
    pub channel: Channel,
    /// Send time stamped in the tribunal's reference zone.
    pub sent_on: DateTime<FixedOffset>,
    /// Recipient address, number, or postal name line.
    pub to: String,
    /// Rendered body in audit display format.
    pub body: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
}
