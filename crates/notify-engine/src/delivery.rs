//! Delivery executor and retry scheduling.
//!
//! Wraps a single channel-send, classifies the failure, and either lets
//! success propagate, enqueues a backoff-delayed retry job, or returns a
//! terminal failure for the orchestrator to translate.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use notify_core::config::retry::RetryConfig;
use notify_core::traits::{JobScheduler, ProviderFailure, ProviderReceipt};
use notify_entity::job::ResendPayload;
use notify_entity::notification::Channel;

/// Provider result codes that mark a rejection as permanent.
const FATAL_STATUS: [u16; 2] = [400, 403];

/// Successful terminal states of one channel-send attempt.
#[derive(Debug)]
pub enum DeliveryAttempt {
    /// The provider accepted the send.
    Sent(ProviderReceipt),
    /// A retry job was enqueued; nothing was delivered on this attempt.
    Rescheduled {
        retry: u32,
        fire_at: DateTime<Utc>,
    },
}

/// Terminal failures of one channel-send attempt.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Network-level failure reaching the provider. Surfaced to the
    /// orchestrator's caller and never rescheduled by this layer.
    #[error("network failure sending {channel}: {message}")]
    TransientNetwork { channel: Channel, message: String },
    /// Permanent provider rejection (bad request or auth). Logged by the
    /// orchestrator, never rescheduled.
    #[error("provider rejected {channel} send with status {status}: {message}")]
    Rejected {
        channel: Channel,
        status: u16,
        message: String,
    },
    /// The retry budget is spent (or retrying is disabled for this job).
    #[error("retry budget exhausted for {channel} send at retry {retry}: status {status}")]
    RetryExhausted {
        channel: Channel,
        retry: u32,
        status: u16,
    },
    /// The retry job itself could not be enqueued.
    #[error("failed to schedule retry for {channel} send: {message}")]
    Scheduling { channel: Channel, message: String },
}

/// Executes channel sends and schedules retries for retryable rejections.
#[derive(Debug, Clone)]
pub struct DeliveryExecutor {
    scheduler: Arc<dyn JobScheduler>,
    retry: RetryConfig,
}

impl DeliveryExecutor {
    pub fn new(scheduler: Arc<dyn JobScheduler>, retry: RetryConfig) -> Self {
        Self { scheduler, retry }
    }

    /// Run one channel-send attempt.
    ///
    /// `payload.retry` is the current retry counter: 0 disables
    /// rescheduling entirely, anything above the configured maximum
    /// terminates the chain.
    pub async fn execute<F, Fut>(
        &self,
        payload: &ResendPayload,
        channel: Channel,
        send: F,
    ) -> Result<DeliveryAttempt, DeliveryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ProviderReceipt, ProviderFailure>>,
    {
        match send().await {
            Ok(receipt) => {
                info!(
                    case_id = %payload.case_id,
                    event_id = %payload.event_id,
                    channel = channel.as_str(),
                    notification_id = %receipt.notification_id,
                    "notification accepted by provider"
                );
                Ok(DeliveryAttempt::Sent(receipt))
            }
            Err(ProviderFailure::Network(message)) => {
                error!(
                    case_id = %payload.case_id,
                    event_id = %payload.event_id,
                    channel = channel.as_str(),
                    %message,
                    "network failure reaching provider"
                );
                Err(DeliveryError::TransientNetwork { channel, message })
            }
            Err(ProviderFailure::Rejected { status, message }) => {
                self.handle_rejection(payload, channel, status, message)
                    .await
            }
        }
    }

    async fn handle_rejection(
        &self,
        payload: &ResendPayload,
        channel: Channel,
        status: u16,
        message: String,
    ) -> Result<DeliveryAttempt, DeliveryError> {
        if FATAL_STATUS.contains(&status) {
            warn!(
                case_id = %payload.case_id,
                event_id = %payload.event_id,
                channel = channel.as_str(),
                status,
                %message,
                "permanent provider rejection, not rescheduling"
            );
            return Err(DeliveryError::Rejected {
                channel,
                status,
                message,
            });
        }
        if payload.retry == 0 || payload.retry > self.retry.max_retries {
            warn!(
                case_id = %payload.case_id,
                event_id = %payload.event_id,
                channel = channel.as_str(),
                retry = payload.retry,
                status,
                "retry budget exhausted"
            );
            return Err(DeliveryError::RetryExhausted {
                channel,
                retry: payload.retry,
                status,
            });
        }

        let backoff = self.retry.backoff_for(payload.retry);
        let fire_at = Utc::now() + Duration::seconds(backoff as i64);
        let next = ResendPayload::new(
            payload.case_id.clone(),
            payload.event_id,
            payload.retry + 1,
        );
        let job = serde_json::to_value(&next).map_err(|e| DeliveryError::Scheduling {
            channel,
            message: e.to_string(),
        })?;
        self.scheduler
            .schedule(&next.group_key(), &next.event_id, job, fire_at)
            .await
            .map_err(|e| DeliveryError::Scheduling {
                channel,
                message: e.to_string(),
            })?;
        info!(
            case_id = %payload.case_id,
            event_id = %payload.event_id,
            channel = channel.as_str(),
            retry = next.retry,
            backoff_seconds = backoff,
            "provider rejection rescheduled"
        );
        Ok(DeliveryAttempt::Rescheduled {
            retry: next.retry,
            fire_at,
        })
    }
}
