//! Subscription resolver.
//!
//! Expands one eligible case event into the list of recipients to notify,
//! applying the reissue type override, per-party validity checks, and the
//! subscription-update resend rules.

use chrono::{DateTime, Utc};
use tracing::debug;

use notify_entity::case::CaseSnapshot;
use notify_entity::event::{CaseEvent, CaseEventContext, NotifiableEventType};
use notify_entity::notification::Destination;
use notify_entity::subscription::{PartyType, Subscription, SubscriptionWithType};

/// A resend of the previous substantive event, triggered by a party
/// gaining a new contact channel.
#[derive(Debug, Clone)]
pub struct ResendCandidate {
    pub event_type: NotifiableEventType,
    pub recipient: SubscriptionWithType,
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionResolver;

impl SubscriptionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite the event type where the case data says the generic trigger
    /// stands for something more specific.
    ///
    /// A reissue event is remapped onto the event type of the document
    /// being re-sent, and flagged so the resend filters apply downstream.
    /// Draft-pathway events are normalized to their non-draft
    /// counterparts without the flag.
    pub fn apply_type_override(&self, event: &CaseEvent, case: &CaseSnapshot) -> CaseEvent {
        match event.event_type {
            NotifiableEventType::ReissueDocument => {
                let remapped = case
                    .reissue
                    .as_ref()
                    .and_then(|r| NotifiableEventType::from_reissue_code(&r.document_code));
                match remapped {
                    Some(event_type) => CaseEvent {
                        id: event.id,
                        event_type,
                        overridden: true,
                    },
                    None => event.clone(),
                }
            }
            NotifiableEventType::DraftToValidAppealCreated => CaseEvent {
                id: event.id,
                event_type: NotifiableEventType::ValidAppealCreated,
                overridden: event.overridden,
            },
            NotifiableEventType::DraftToNonCompliant => CaseEvent {
                id: event.id,
                event_type: NotifiableEventType::NonCompliant,
                overridden: event.overridden,
            },
            _ => event.clone(),
        }
    }

    /// Expand an event into the recipients to notify, in party order.
    pub fn resolve(
        &self,
        context: &CaseEventContext,
        now: DateTime<Utc>,
    ) -> Vec<SubscriptionWithType> {
        let event = &context.event;
        let case = &context.new;
        let mut recipients = Vec::new();

        // Appellant and appointee are mutually exclusive.
        if case.has_appointee() {
            recipients.push(SubscriptionWithType::new(
                case.appointee_subscription.clone().unwrap_or_default(),
                PartyType::Appointee,
            ));
        } else {
            recipients.push(SubscriptionWithType::new(
                case.appellant_subscription.clone().unwrap_or_default(),
                PartyType::Appellant,
            ));
        }
        if case.has_representative() {
            recipients.push(SubscriptionWithType::new(
                case.representative_subscription.clone().unwrap_or_default(),
                PartyType::Representative,
            ));
        }
        if self.joint_party_is_named(case) {
            recipients.push(SubscriptionWithType::new(
                case.joint_party_subscription.clone().unwrap_or_default(),
                PartyType::JointParty,
            ));
        }
        for party in &case.other_parties {
            if event.event_type == NotifiableEventType::UpdateOtherPartyData
                && !party.send_new_notification
            {
                continue;
            }
            recipients.push(SubscriptionWithType::new(
                party.notifiable_subscription().cloned().unwrap_or_default(),
                PartyType::OtherParty(match &party.appointee {
                    Some(appointee) => appointee.id.clone(),
                    None => party.id.clone(),
                }),
            ));
            if let Some(representative) = &party.representative {
                recipients.push(SubscriptionWithType::new(
                    representative.subscription.clone().unwrap_or_default(),
                    PartyType::OtherParty(representative.id.clone()),
                ));
            }
        }

        recipients.retain(|recipient| {
            self.passes_override_filter(event, case, recipient)
                && self.is_actionable(event.event_type, &recipient.subscription, case, now)
        });
        debug!(
            case_id = %case.case_id,
            event = %event.event_type,
            recipients = recipients.len(),
            "resolved notification recipients"
        );
        recipients
    }

    fn joint_party_is_named(&self, case: &CaseSnapshot) -> bool {
        case.joint_party
            .as_ref()
            .and_then(|j| j.details.as_ref())
            .is_some_and(|d| !d.name.last_name.trim().is_empty())
    }

    /// Once the event type was overridden by a reissue, only the parties
    /// the caseworker flagged for resend stay in.
    fn passes_override_filter(
        &self,
        event: &CaseEvent,
        case: &CaseSnapshot,
        recipient: &SubscriptionWithType,
    ) -> bool {
        if !event.overridden {
            return true;
        }
        let Some(reissue) = case.reissue.as_ref() else {
            return false;
        };
        match &recipient.party {
            PartyType::Appellant | PartyType::Appointee => reissue.resend_to_appellant,
            PartyType::Representative => reissue.resend_to_representative,
            PartyType::JointParty => false,
            PartyType::OtherParty(id) => reissue.other_party_resend_ids.iter().any(|r| r == id),
        }
    }

    /// Shared validity check, also re-evaluated per channel at dispatch
    /// time: the recipient has a live subscription and the event still
    /// matches the case's hearing data.
    pub fn is_still_valid(
        &self,
        event_type: NotifiableEventType,
        subscription: &Subscription,
        case: &CaseSnapshot,
        now: DateTime<Utc>,
    ) -> bool {
        subscription.has_subscriptions() && self.hearing_checks_pass(event_type, case, now)
    }

    fn hearing_checks_pass(
        &self,
        event_type: NotifiableEventType,
        case: &CaseSnapshot,
        now: DateTime<Utc>,
    ) -> bool {
        if event_type.requires_future_hearing() && !case.has_future_hearing(now) {
            return false;
        }
        event_type
            .permitted_hearing_types()
            .contains(&case.hearing_type)
    }

    fn is_actionable(
        &self,
        event_type: NotifiableEventType,
        subscription: &Subscription,
        case: &CaseSnapshot,
        now: DateTime<Utc>,
    ) -> bool {
        event_type.is_mandatory_letter()
            || self.is_still_valid(event_type, subscription, case, now)
    }

    /// For a subscription-update event, work out which parties just gained
    /// a channel and should have the previous substantive event re-sent to
    /// them on that channel only.
    pub fn resend_candidates(&self, context: &CaseEventContext) -> Vec<ResendCandidate> {
        if context.event.event_type != NotifiableEventType::SubscriptionUpdated {
            return Vec::new();
        }
        let Some(old_case) = context.old.as_ref() else {
            return Vec::new();
        };
        let Some(previous_event) = self.previous_substantive_event(&context.new) else {
            return Vec::new();
        };

        let case = &context.new;
        let pairs: [(PartyType, Option<&Subscription>, Option<&Subscription>); 3] = [
            if case.has_appointee() {
                (
                    PartyType::Appointee,
                    case.appointee_subscription.as_ref(),
                    old_case.appointee_subscription.as_ref(),
                )
            } else {
                (
                    PartyType::Appellant,
                    case.appellant_subscription.as_ref(),
                    old_case.appellant_subscription.as_ref(),
                )
            },
            (
                PartyType::Representative,
                case.representative_subscription.as_ref(),
                old_case.representative_subscription.as_ref(),
            ),
            (
                PartyType::JointParty,
                case.joint_party_subscription.as_ref(),
                old_case.joint_party_subscription.as_ref(),
            ),
        ];

        let mut candidates = Vec::new();
        for (party, new_sub, old_sub) in pairs {
            let Some(new_sub) = new_sub else { continue };
            let old_sub = old_sub.cloned().unwrap_or_default();
            let email_added = !old_sub.is_email_subscribed() && new_sub.is_email_subscribed();
            let sms_added = !old_sub.is_sms_subscribed() && new_sub.is_sms_subscribed();
            if !email_added && !sms_added {
                continue;
            }
            candidates.push(ResendCandidate {
                event_type: previous_event,
                recipient: SubscriptionWithType::new(
                    new_sub.scrubbed(email_added, sms_added),
                    party,
                ),
            });
        }
        candidates
    }

    /// Most recent history entry's event type, unless that entry is itself
    /// a subscription update (in which case no resend happens at all).
    fn previous_substantive_event(&self, case: &CaseSnapshot) -> Option<NotifiableEventType> {
        let latest = case.history.first()?;
        let event_type = NotifiableEventType::from_id(&latest.event_id)?;
        if event_type == NotifiableEventType::SubscriptionUpdated {
            return None;
        }
        Some(event_type)
    }

    /// Destination for the parallel notification sent to a party's
    /// previous contact details after a subscription update. Per channel:
    /// the old value when it actually changed, nothing when it is
    /// unchanged.
    pub fn echoed_destination(
        &self,
        new_sub: &Subscription,
        old_sub: &Subscription,
    ) -> Option<Destination> {
        let email = changed_or_legacy(new_sub.email.as_deref(), old_sub.email.as_deref());
        let mobile = changed_or_legacy(new_sub.mobile.as_deref(), old_sub.mobile.as_deref());
        if email.is_none() && mobile.is_none() {
            return None;
        }
        Some(Destination { email, mobile })
    }
}

/// Old-value selection for the old-subscription echo. When both old and
/// new are present, the old value is used only if it differs. When either
/// side is absent, the old value is echoed, falling back to an empty
/// string. The empty-string fallback is long-standing behaviour relied on
/// downstream; see the pinning test before changing it.
fn changed_or_legacy(new: Option<&str>, old: Option<&str>) -> Option<String> {
    match (new, old) {
        (Some(new), Some(old)) => (new != old).then(|| old.to_owned()),
        (_, old) => Some(old.unwrap_or_default().to_owned()),
    }
}
