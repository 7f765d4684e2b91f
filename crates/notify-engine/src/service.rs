//! Notification service: the subsystem's single entry point.
//!
//! Normalizes the event type, gates eligibility, defers out-of-hours and
//! fixed-delay events to the scheduler, then expands the event into
//! recipients and dispatches each. Also drives the subscription-update
//! follow-ups: resending the previous substantive event to a newly added
//! channel and echoing the change to the party's previous contact details.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use notify_core::config::NotifyConfig;
use notify_core::traits::JobScheduler;
use notify_core::NotifyResult;
use notify_entity::case::CaseSnapshot;
use notify_entity::event::{CaseEvent, CaseEventContext, NotifiableEventType};
use notify_entity::job::ResendPayload;
use notify_entity::notification::Notification;
use notify_entity::subscription::{PartyType, Subscription, SubscriptionWithType};

use crate::dispatch::DispatchOrchestrator;
use crate::eligibility::EligibilityGate;
use crate::resolver::SubscriptionResolver;
use crate::traits::NotificationBuilder;
use crate::window::DeliveryWindow;

/// Fixed legacy templates used for the notification sent to a party's
/// previous contact details after a subscription update.
const OLD_CONTACT_EMAIL_TEMPLATE: &str = "subscription-updated-old-email";
const OLD_CONTACT_SMS_TEMPLATE: &str = "subscription-updated-old-sms";

#[derive(Debug)]
pub struct NotificationService {
    gate: EligibilityGate,
    window: DeliveryWindow,
    resolver: SubscriptionResolver,
    builder: Arc<dyn NotificationBuilder>,
    orchestrator: DispatchOrchestrator,
    scheduler: Arc<dyn JobScheduler>,
}

impl NotificationService {
    pub fn new(
        config: &NotifyConfig,
        builder: Arc<dyn NotificationBuilder>,
        orchestrator: DispatchOrchestrator,
        scheduler: Arc<dyn JobScheduler>,
    ) -> NotifyResult<Self> {
        Ok(Self {
            gate: EligibilityGate::new(&config.features),
            window: DeliveryWindow::from_config(&config.window)?,
            resolver: SubscriptionResolver::new(),
            builder,
            orchestrator,
            scheduler,
        })
    }

    /// Entry point for a live inbound case event.
    pub async fn manage_notification_and_subscription(
        &self,
        context: CaseEventContext,
        from_retry_path: bool,
    ) -> NotifyResult<()> {
        self.process(context, from_retry_path, 1).await
    }

    /// Re-entry point for a deferred or retried job firing from the
    /// scheduler. Deferral checks are skipped; the payload carries the
    /// retry counter forward.
    pub async fn process_scheduled(
        &self,
        context: CaseEventContext,
        payload: &ResendPayload,
    ) -> NotifyResult<()> {
        self.process(context, true, payload.retry).await
    }

    async fn process(
        &self,
        mut context: CaseEventContext,
        from_retry_path: bool,
        retry: u32,
    ) -> NotifyResult<()> {
        context.event = self.resolver.apply_type_override(&context.event, &context.new);
        if !self.gate.is_eligible(&context) {
            return Ok(());
        }

        let now = Utc::now();
        if !from_retry_path {
            let event_type = context.event.event_type;
            if self.window.is_out_of_hours(now) && !event_type.allow_out_of_hours() {
                let fire_at = self.window.next_in_hours_slot(now);
                info!(
                    case_id = %context.new.case_id,
                    event_id = %context.event.id,
                    event = %event_type,
                    %fire_at,
                    "out of hours, deferring delivery"
                );
                return self.defer(&context, fire_at).await;
            }
            if event_type.is_delayed() {
                let fire_at = now + Duration::seconds(event_type.delay_seconds());
                info!(
                    case_id = %context.new.case_id,
                    event_id = %context.event.id,
                    event = %event_type,
                    %fire_at,
                    "event carries a fixed delay, deferring delivery"
                );
                return self.defer(&context, fire_at).await;
            }
        }

        for recipient in self.resolver.resolve(&context, now) {
            self.notify_recipient(&context, &recipient, retry).await?;
        }
        if context.event.event_type == NotifiableEventType::SubscriptionUpdated {
            self.resend_previous_event(&context, retry).await?;
        }
        if context.event.event_type == NotifiableEventType::DwpUploadResponse {
            self.notify_updated_other_parties(&context, retry).await?;
        }
        Ok(())
    }

    /// Deferred deliveries enter the retry path with counter 1 so a later
    /// provider rejection still has its full retry budget.
    async fn defer(&self, context: &CaseEventContext, fire_at: DateTime<Utc>) -> NotifyResult<()> {
        let payload = ResendPayload::new(context.new.case_id.clone(), context.event.id, 1);
        self.scheduler
            .schedule(
                &payload.group_key(),
                &payload.event_id,
                serde_json::to_value(&payload)?,
                fire_at,
            )
            .await
    }

    async fn notify_recipient(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
        retry: u32,
    ) -> NotifyResult<()> {
        // Template resolution failures are absorbed: processing moves to
        // the next party.
        let notification = match self.builder.build(context, recipient).await {
            Ok(notification) => notification,
            Err(error) => {
                warn!(
                    case_id = %context.new.case_id,
                    event_id = %context.event.id,
                    party = recipient.party.label(),
                    %error,
                    "failed to build notification, skipping recipient"
                );
                return Ok(());
            }
        };
        self.orchestrator
            .dispatch(context, recipient, &notification, retry)
            .await?;

        if context.event.event_type == NotifiableEventType::SubscriptionUpdated {
            self.echo_to_old_contact(context, recipient, &notification, retry)
                .await?;
        }
        Ok(())
    }

    /// After a subscription update is delivered to the new details, inform
    /// the party at their previous contact details too.
    async fn echo_to_old_contact(
        &self,
        context: &CaseEventContext,
        recipient: &SubscriptionWithType,
        notification: &Notification,
        retry: u32,
    ) -> NotifyResult<()> {
        let Some(old_case) = context.old.as_ref() else {
            return Ok(());
        };
        let old_sub = subscription_for(old_case, &recipient.party)
            .cloned()
            .unwrap_or_default();
        let Some(destination) = self
            .resolver
            .echoed_destination(&recipient.subscription, &old_sub)
        else {
            return Ok(());
        };

        let echo_recipient = SubscriptionWithType::new(
            Subscription {
                email: destination.email.clone(),
                mobile: destination.mobile.clone(),
                subscribe_email: old_sub.subscribe_email
                    && destination.email.as_deref().is_some_and(|e| !e.is_empty()),
                subscribe_sms: old_sub.subscribe_sms
                    && destination.mobile.as_deref().is_some_and(|m| !m.is_empty()),
            },
            recipient.party.clone(),
        );
        let echo_notification = Notification {
            destination,
            email_template: Some(OLD_CONTACT_EMAIL_TEMPLATE.to_owned()),
            sms_templates: vec![OLD_CONTACT_SMS_TEMPLATE.to_owned()],
            letter_template: None,
            docmosis_template: None,
            placeholders: notification.placeholders.clone(),
            reference: notification.reference.clone(),
        };
        self.orchestrator
            .dispatch(context, &echo_recipient, &echo_notification, retry)
            .await?;
        Ok(())
    }

    /// Re-trigger the previous substantive event for parties that just
    /// gained a contact channel, on the new channel only.
    async fn resend_previous_event(
        &self,
        context: &CaseEventContext,
        retry: u32,
    ) -> NotifyResult<()> {
        for candidate in self.resolver.resend_candidates(context) {
            let resend_context = CaseEventContext {
                event: CaseEvent {
                    id: context.event.id,
                    event_type: candidate.event_type,
                    overridden: false,
                },
                new: context.new.clone(),
                old: context.old.clone(),
            };
            self.notify_recipient(&resend_context, &candidate.recipient, retry)
                .await?;
        }
        Ok(())
    }

    /// An upload response also notifies the other parties the change
    /// concerns, under the data-update event type.
    async fn notify_updated_other_parties(
        &self,
        context: &CaseEventContext,
        retry: u32,
    ) -> NotifyResult<()> {
        if !context.new.other_parties.iter().any(|p| p.send_new_notification) {
            return Ok(());
        }
        let follow_context = CaseEventContext {
            event: CaseEvent {
                id: context.event.id,
                event_type: NotifiableEventType::UpdateOtherPartyData,
                overridden: false,
            },
            new: context.new.clone(),
            old: context.old.clone(),
        };
        if !self.gate.is_eligible(&follow_context) {
            return Ok(());
        }
        let recipients: Vec<_> = self
            .resolver
            .resolve(&follow_context, Utc::now())
            .into_iter()
            .filter(|r| matches!(r.party, PartyType::OtherParty(_)))
            .collect();
        for recipient in recipients {
            self.notify_recipient(&follow_context, &recipient, retry)
                .await?;
        }
        Ok(())
    }
}

fn subscription_for<'a>(case: &'a CaseSnapshot, party: &PartyType) -> Option<&'a Subscription> {
    match party {
        PartyType::Appellant => case.appellant_subscription.as_ref(),
        PartyType::Appointee => case.appointee_subscription.as_ref(),
        PartyType::Representative => case.representative_subscription.as_ref(),
        PartyType::JointParty => case.joint_party_subscription.as_ref(),
        PartyType::OtherParty(id) => case.other_parties.iter().find_map(|p| {
            if p.id == *id {
                return p.notifiable_subscription();
            }
            if let Some(appointee) = &p.appointee {
                if appointee.id == *id {
                    return appointee.subscription.as_ref();
                }
            }
            if let Some(representative) = &p.representative {
                if representative.id == *id {
                    return representative.subscription.as_ref();
                }
            }
            None
        }),
    }
}
