//! Scheduled-job payload handler.

use std::sync::Arc;

use tracing::info;

use notify_core::NotifyResult;
use notify_engine::service::NotificationService;
use notify_engine::traits::CaseEventSource;
use notify_entity::job::ResendPayload;

/// Handles a fired scheduler job by reloading the case and re-entering
/// the engine on the retry path.
#[derive(Debug)]
pub struct DeferredNotificationHandler {
    source: Arc<dyn CaseEventSource>,
    service: Arc<NotificationService>,
}

impl DeferredNotificationHandler {
    pub fn new(source: Arc<dyn CaseEventSource>, service: Arc<NotificationService>) -> Self {
        Self { source, service }
    }

    /// Decode one job payload and process it.
    ///
    /// The snapshot is re-read at fire time; a job enqueued hours ago acts
    /// on the case as it stands now, and the eligibility gate re-runs
    /// against that current state.
    pub async fn handle(&self, payload: serde_json::Value) -> NotifyResult<()> {
        let payload: ResendPayload = serde_json::from_value(payload)?;
        info!(
            case_id = %payload.case_id,
            event_id = %payload.event_id,
            retry = payload.retry,
            "scheduled notification job fired"
        );
        let context = self
            .source
            .load(&payload.case_id, &payload.event_id)
            .await?;
        self.service.process_scheduled(context, &payload).await
    }
}
