//! Dispatch orchestrator.
//!
//! For one resolved (event, recipient) pair, attempts email, then SMS,
//! then letter. Letter delivery runs through exactly one of three paths:
//! bundled PDF, interlocutory, or standard digital-pathway letter; a
//! bundled letter over the provider's page limit diverts to bulk print and
//! never also goes through the provider.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::warn;

use notify_core::config::NotifyConfig;
use notify_core::traits::{BulkPrinter, DocumentStore, PdfLetterService};
use notify_core::{ErrorKind, NotifyError, NotifyResult};
use notify_entity::event::CaseEventContext;
use notify_entity::job::ResendPayload;
use notify_entity::notification::{Channel, DeliveryOutcome, Notification};
use notify_entity::subscription::SubscriptionWithType;

use crate::delivery::{DeliveryAttempt, DeliveryError, DeliveryExecutor};
use crate::letters;
use crate::resolver::SubscriptionResolver;
use crate::sender::{NotificationGateway, SendContext};

#[derive(Debug)]
pub struct DispatchOrchestrator {
    gateway: Arc<NotificationGateway>,
    executor: DeliveryExecutor,
    resolver: SubscriptionResolver,
    pdf: Arc<dyn PdfLetterService>,
    documents: Arc<dyn DocumentStore>,
    bulk_printer: Arc<dyn BulkPrinter>,
    letter_page_limit: usize,
    response_delay_seconds: i64,
}

impl DispatchOrchestrator {
    pub fn new(
        gateway: Arc<NotificationGateway>,
        executor: DeliveryExecutor,
        pdf: Arc<dyn PdfLetterService>,
        documents: Arc<dyn DocumentStore>,
        bulk_printer: Arc<dyn BulkPrinter>,
        config: &NotifyConfig,
    ) -> Self {
        Self {
            gateway,
            executor,
            resolver: SubscriptionResolver::new(),
            pdf,
            documents,
            bulk_printer,
            letter_page_limit: config.provider.letter_page_limit,
            response_delay_seconds: config.retry.response_delay_seconds,
        }
    }

    /// Attempt every applicable channel for one recipient, aggregating
    /// per-channel outcomes. A recipient with nothing to send is a
    /// legitimate terminal state, logged but not an error.
    pub async fn dispatch(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
        notification: &Notification,
        retry: u32,
    ) -> NotifyResult<DeliveryOutcome> {
        let case = &context.new;
        let payload = ResendPayload::new(case.case_id.clone(), context.event.id, retry);
        let send_context = SendContext {
            case_id: case.case_id.clone(),
            event_id: context.event.id,
        };
        let mut outcome = DeliveryOutcome::default();

        self.dispatch_email(context, recipient, notification, &payload, &send_context, &mut outcome)
            .await?;
        self.dispatch_sms(context, recipient, notification, &payload, &send_context, &mut outcome)
            .await?;
        if context.event.event_type.is_mandatory_letter() {
            self.dispatch_letter(context, recipient, notification, &payload, &send_context, &mut outcome)
                .await?;
        }

        if !outcome.anything_sent() {
            warn!(
                case_id = %case.case_id,
                event_id = %context.event.id,
                event = %context.event.event_type,
                party = recipient.party.label(),
                "notification not delivered on any channel"
            );
        }
        Ok(outcome)
    }

    async fn dispatch_email(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
        notification: &Notification,
        payload: &ResendPayload,
        send_context: &SendContext,
        outcome: &mut DeliveryOutcome,
    ) -> NotifyResult<()> {
        let still_valid = self.resolver.is_still_valid(
            context.event.event_type,
            &recipient.subscription,
            &context.new,
            Utc::now(),
        );
        if !recipient.subscription.is_email_subscribed()
            || !notification.has_email_template()
            || !still_valid
        {
            return Ok(());
        }
        let (Some(template), Some(to)) = (
            notification.email_template.as_deref(),
            notification.destination.email.as_deref(),
        ) else {
            return Ok(());
        };

        let attempt = self
            .executor
            .execute(payload, Channel::Email, || {
                self.gateway.send_email(
                    send_context,
                    template,
                    to,
                    &notification.placeholders,
                    &notification.reference,
                )
            })
            .await;
        match attempt {
            Ok(DeliveryAttempt::Sent(receipt)) => {
                outcome.email_sent = true;
                outcome.receipts.push(receipt);
                Ok(())
            }
            Ok(DeliveryAttempt::Rescheduled { .. }) => Ok(()),
            Err(error) => self.absorb_or_raise(error),
        }
    }

    async fn dispatch_sms(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
        notification: &Notification,
        payload: &ResendPayload,
        send_context: &SendContext,
        outcome: &mut DeliveryOutcome,
    ) -> NotifyResult<()> {
        let still_valid = self.resolver.is_still_valid(
            context.event.event_type,
            &recipient.subscription,
            &context.new,
            Utc::now(),
        );
        if !recipient.subscription.is_sms_subscribed()
            || !notification.has_sms_template()
            || !still_valid
        {
            return Ok(());
        }
        let Some(to) = notification.destination.mobile.as_deref() else {
            return Ok(());
        };

        // A single event can carry several SMS parts; the channel only
        // counts as sent when every part is accepted.
        let mut attempted = 0;
        let mut accepted = 0;
        for template in notification.sms_templates.iter().filter(|t| !t.is_empty()) {
            attempted += 1;
            let attempt = self
                .executor
                .execute(payload, Channel::Sms, || {
                    self.gateway.send_sms(
                        send_context,
                        template,
                        to,
                        &notification.placeholders,
                        &notification.reference,
                    )
                })
                .await;
            match attempt {
                Ok(DeliveryAttempt::Sent(receipt)) => {
                    accepted += 1;
                    outcome.receipts.push(receipt);
                }
                Ok(DeliveryAttempt::Rescheduled { .. }) => {}
                Err(error) => self.absorb_or_raise(error)?,
            }
        }
        outcome.sms_sent = attempted > 0 && attempted == accepted;
        Ok(())
    }

    async fn dispatch_letter(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
        notification: &Notification,
        payload: &ResendPayload,
        send_context: &SendContext,
        outcome: &mut DeliveryOutcome,
    ) -> NotifyResult<()> {
        let case = &context.new;
        let event_type = context.event.event_type;

        let address = letters::recipient_address(&recipient.party, case);
        let Some(address) = address.filter(|a| a.is_valid_for_letter()) else {
            // Incomplete address is a data-quality problem: logged,
            // terminal, never retried.
            warn!(
                case_id = %case.case_id,
                event_id = %context.event.id,
                party = recipient.party.label(),
                "letter not sent, postal address is incomplete"
            );
            return Ok(());
        };
        let name = letters::recipient_name(&recipient.party, case).unwrap_or_default();
        let postcode = address.postcode.clone().unwrap_or_default();

        let mut personalisation = notification.placeholders.clone();
        letters::enrich_letter_placeholders(
            &mut personalisation,
            &recipient.party,
            case,
            Utc::now(),
            self.response_delay_seconds,
        );

        let has_cover_template = notification
            .docmosis_template
            .as_deref()
            .is_some_and(|t| !t.is_empty());
        if event_type.is_bundled_letter() || has_cover_template {
            self.dispatch_bundled_letter(
                context,
                notification,
                &personalisation,
                &name,
                &postcode,
                payload,
                send_context,
                outcome,
            )
            .await
        } else if let Some(template) = notification.letter_template.as_deref() {
            let standard_path = !event_type.is_interlocutory_letter() && case.created_via_digital_route;
            if !event_type.is_interlocutory_letter() && !standard_path {
                return Ok(());
            }
            let attempt = self
                .executor
                .execute(payload, Channel::Letter, || {
                    self.gateway.send_letter(
                        send_context,
                        template,
                        &personalisation,
                        &postcode,
                        &name,
                    )
                })
                .await;
            match attempt {
                Ok(DeliveryAttempt::Sent(receipt)) => {
                    outcome.letter_sent = true;
                    outcome.receipts.push(receipt);
                    Ok(())
                }
                Ok(DeliveryAttempt::Rescheduled { .. }) => Ok(()),
                Err(error) => self.absorb_or_raise(error),
            }
        } else {
            Ok(())
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch_bundled_letter(
        &self,
        context: &CaseEventContext,
        notification: &Notification,
        personalisation: &std::collections::HashMap<String, String>,
        name: &str,
        postcode: &str,
        payload: &ResendPayload,
        send_context: &SendContext,
        outcome: &mut DeliveryOutcome,
    ) -> NotifyResult<()> {
        let case = &context.new;
        let Some(template) = notification
            .docmosis_template
            .as_deref()
            .filter(|t| !t.is_empty())
        else {
            warn!(
                case_id = %case.case_id,
                event_id = %context.event.id,
                event = %context.event.event_type,
                "bundled letter event without a cover letter template"
            );
            return Ok(());
        };

        let mut bundle = self.pdf.generate_letter(template, personalisation).await?;
        if let Some(document_type) = context.event.event_type.document_type() {
            if let Some(document) = case.latest_document_of_type(document_type.id()) {
                let attachment = self.documents.download(&document.url).await?;
                bundle = self.merge_padded(bundle, attachment)?;
            }
        }
        let coversheet = self.pdf.build_coversheet(&case.case_id, name).await?;
        bundle = self.merge_padded(bundle, coversheet)?;

        let pages = self.pdf.page_count(&bundle)?;
        if pages > self.letter_page_limit {
            // Over the provider's hard limit: divert to bulk print, never
            // also through the provider letter API.
            warn!(
                case_id = %case.case_id,
                event_id = %context.event.id,
                pages,
                limit = self.letter_page_limit,
                "bundled letter over page limit, diverting to bulk print"
            );
            self.bulk_printer
                .bulk_print(&case.case_id, vec![bundle], name)
                .await?;
            outcome.letter_sent = true;
            return Ok(());
        }

        let attempt = self
            .executor
            .execute(payload, Channel::Letter, || {
                self.gateway
                    .send_precompiled_letter(send_context, bundle.clone(), postcode, name)
            })
            .await;
        match attempt {
            Ok(DeliveryAttempt::Sent(receipt)) => {
                outcome.letter_sent = true;
                outcome.receipts.push(receipt);
                Ok(())
            }
            Ok(DeliveryAttempt::Rescheduled { .. }) => Ok(()),
            Err(error) => self.absorb_or_raise(error),
        }
    }

    fn merge_padded(&self, bundle: Bytes, appended: Bytes) -> NotifyResult<Bytes> {
        let padded = self.pdf.pad_to_even_pages(appended)?;
        self.pdf.merge(bundle, padded)
    }

    /// Permanent provider rejections are absorbed here; network failures,
    /// exhausted retries, and scheduling failures surface to the caller.
    fn absorb_or_raise(&self, error: DeliveryError) -> NotifyResult<()> {
        match error {
            DeliveryError::Rejected { .. } => {
                warn!(%error, "permanent provider rejection absorbed");
                Ok(())
            }
            DeliveryError::TransientNetwork { .. } => Err(NotifyError::with_source(
                ErrorKind::TransientNetwork,
                error.to_string(),
                error,
            )),
            DeliveryError::RetryExhausted { .. } => Err(NotifyError::with_source(
                ErrorKind::RetryExhausted,
                error.to_string(),
                error,
            )),
            DeliveryError::Scheduling { .. } => Err(NotifyError::scheduling(error.to_string())),
        }
    }
}
