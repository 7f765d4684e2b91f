//! Provider gateway and correspondence auditing.
//!
//! The gateway owns two provider clients, one per credential set, and
//! chooses between them per recipient using the configured allow-lists.
//! After every accepted send it hands an audit record to the auditor,
//! which persists it in the background and never blocks or fails the
//! triggering send.

use std::collections::HashMap;

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use chrono_tz::Tz;
use rand::Rng;
use tracing::{debug, warn};

use notify_core::config::correspondence::CorrespondenceConfig;
use notify_core::config::provider::ProviderConfig;
use notify_core::traits::{MarkdownRenderer, ProviderClient, ProviderFailure, ProviderReceipt};
use notify_core::types::{CaseId, EventId};
use notify_entity::correspondence::Correspondence;
use notify_entity::notification::Channel;

use crate::traits::CorrespondenceStore;

/// Identifies the case event a send belongs to, for audit records.
#[derive(Debug, Clone)]
pub struct SendContext {
    pub case_id: CaseId,
    pub event_id: EventId,
}

/// Routes sends to the production or test credential set and records
/// correspondence after each accepted send.
#[derive(Debug)]
pub struct NotificationGateway {
    production: Arc<dyn ProviderClient>,
    test: Arc<dyn ProviderClient>,
    config: ProviderConfig,
    auditor: Arc<CorrespondenceAuditor>,
}

impl NotificationGateway {
    pub fn new(
        production: Arc<dyn ProviderClient>,
        test: Arc<dyn ProviderClient>,
        config: ProviderConfig,
        auditor: Arc<CorrespondenceAuditor>,
    ) -> Self {
        Self {
            production,
            test,
            config,
            auditor,
        }
    }

    pub async fn send_email(
        &self,
        context: &SendContext,
        template_id: &str,
        to: &str,
        personalisation: &HashMap<String, String>,
        reference: &str,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        let client = if self.config.is_test_email(to) {
            debug!(to, "email routed to test credential set");
            &self.test
        } else {
            &self.production
        };
        let receipt = client
            .send_email(template_id, to, personalisation, reference)
            .await?;
        self.auditor.record(context, Channel::Email, to, &receipt);
        Ok(receipt)
    }

    pub async fn send_sms(
        &self,
        context: &SendContext,
        template_id: &str,
        to: &str,
        personalisation: &HashMap<String, String>,
        reference: &str,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        let client = if self.config.is_test_number(to) {
            debug!(to, "sms routed to test credential set");
            &self.test
        } else {
            &self.production
        };
        let receipt = client
            .send_sms(template_id, to, personalisation, reference)
            .await?;
        self.auditor.record(context, Channel::Sms, to, &receipt);
        Ok(receipt)
    }

    pub async fn send_letter(
        &self,
        context: &SendContext,
        template_id: &str,
        personalisation: &HashMap<String, String>,
        postcode: &str,
        recipient: &str,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        let client = if self.config.is_test_postcode(postcode) {
            debug!(postcode, "letter routed to test credential set");
            &self.test
        } else {
            &self.production
        };
        let receipt = client
            .send_letter(template_id, personalisation, &context.case_id)
            .await?;
        self.auditor
            .record(context, Channel::Letter, recipient, &receipt);
        Ok(receipt)
    }

    pub async fn send_precompiled_letter(
        &self,
        context: &SendContext,
        pdf: Bytes,
        postcode: &str,
        recipient: &str,
    ) -> Result<ProviderReceipt, ProviderFailure> {
        let client = if self.config.is_test_postcode(postcode) {
            debug!(postcode, "bundled letter routed to test credential set");
            &self.test
        } else {
            &self.production
        };
        let receipt = client
            .send_precompiled_letter(&context.case_id, pdf)
            .await?;
        self.auditor
            .record(context, Channel::Letter, recipient, &receipt);
        Ok(receipt)
    }
}

/// Persists correspondence audit records best-effort in the background.
#[derive(Debug)]
pub struct CorrespondenceAuditor {
    store: Arc<dyn CorrespondenceStore>,
    renderer: Arc<dyn MarkdownRenderer>,
    config: CorrespondenceConfig,
    /// Reference zone the `sent_on` stamp is expressed in.
    zone: Tz,
}

impl CorrespondenceAuditor {
    pub fn new(
        store: Arc<dyn CorrespondenceStore>,
        renderer: Arc<dyn MarkdownRenderer>,
        config: CorrespondenceConfig,
        zone: Tz,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            renderer,
            config,
            zone,
        })
    }

    /// Hand one accepted send to the background audit task. Fire and
    /// forget: the caller must never await or observe the write.
    pub fn record(
        self: &Arc<Self>,
        context: &SendContext,
        channel: Channel,
        to: &str,
        receipt: &ProviderReceipt,
    ) {
        if !self.config.save_correspondence {
            return;
        }
        let record = Correspondence {
            case_id: context.case_id.clone(),
            event_id: context.event_id,
            notification_id: receipt.notification_id,
            channel,
            sent_on: Utc::now().with_timezone(&self.zone).fixed_offset(),
            to: to.to_owned(),
            body: self
                .renderer
                .to_display(receipt.body.as_deref().unwrap_or_default()),
            subject: receipt.subject.clone(),
            from: receipt.from.clone(),
        };
        let auditor = Arc::clone(self);
        tokio::spawn(async move {
            auditor.save_with_backoff(record).await;
        });
    }

    async fn save_with_backoff(&self, record: Correspondence) {
        let base = self.config.base_backoff_ms.max(1);
        for attempt in 0..self.config.max_attempts {
            match self.store.save(&record).await {
                Ok(()) => return,
                Err(error) => {
                    warn!(
                        case_id = %record.case_id,
                        event_id = %record.event_id,
                        channel = record.channel.as_str(),
                        attempt,
                        %error,
                        "correspondence audit write failed"
                    );
                    if attempt + 1 < self.config.max_attempts {
                        let jitter = { rand::thread_rng().gen_range(0..base) };
                        let delay = base * 2u64.saturating_pow(attempt) + jitter;
                        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                    }
                }
            }
        }
        warn!(
            case_id = %record.case_id,
            event_id = %record.event_id,
            "correspondence audit write abandoned"
        );
    }
}
