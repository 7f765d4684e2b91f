//! Eligibility gate.
//!
//! Evaluated once per event before any party expansion. The first matching
//! rejection wins; every rejection is logged with the case and event ids
//! so a silent drop is still traceable.

use tracing::info;

use notify_core::config::features::FeaturesConfig;
use notify_entity::case::{CaseSnapshot, HearingRoute};
use notify_entity::event::{CaseEventContext, NotifiableEventType};

/// Pure predicate deciding whether a triggered event is still notifiable.
#[derive(Debug, Clone)]
pub struct EligibilityGate {
    hearing_notifications_enabled: bool,
}

impl EligibilityGate {
    pub fn new(features: &FeaturesConfig) -> Self {
        Self {
            hearing_notifications_enabled: features.hearing_notifications_enabled,
        }
    }

    /// Whether processing of this event should continue at all.
    pub fn is_eligible(&self, context: &CaseEventContext) -> bool {
        let event_type = context.event.event_type;
        let case = &context.new;

        if let Some(reason) = self.rejection_reason(event_type, case) {
            info!(
                case_id = %case.case_id,
                event_id = %context.event.id,
                event = %event_type,
                reason,
                "event not eligible for notification"
            );
            return false;
        }
        true
    }

    fn rejection_reason(
        &self,
        event_type: NotifiableEventType,
        case: &CaseSnapshot,
    ) -> Option<&'static str> {
        if event_type == NotifiableEventType::RequestForInformation
            && !matches!(case.information_from_appellant.as_deref(), Some("yes"))
        {
            return Some("information request without appellant-supplied information");
        }
        if event_type.is_further_evidence_action()
            && matches!(
                case.original_sender.as_deref(),
                Some("respondent") | Some("tribunal")
            )
        {
            return Some("further-evidence action originated by respondent or tribunal");
        }
        if case.state.is_dormant() && !event_type.is_dormant_allowed() {
            return Some("case dormant and event not on dormant allow-list");
        }
        if event_type == NotifiableEventType::HearingBooked && case.final_decision_issued {
            return Some("hearing booked after final decision issued");
        }
        if case.language_preference == notify_entity::case::LanguagePreference::Welsh
            && event_type.is_welsh_excluded()
        {
            return Some("event excluded on Welsh-language cases");
        }
        if event_type == NotifiableEventType::ProcessAudioVideo
            && !case
                .audio_video_action
                .as_ref()
                .is_some_and(|action| action.produces_notice())
        {
            return Some("audio/video action does not produce a notice");
        }
        if event_type == NotifiableEventType::Postponement
            && case.hearing_route != HearingRoute::ListAssist
        {
            return Some("postponement outside the supported listing route");
        }
        if event_type == NotifiableEventType::DwpUploadResponse && !case.created_via_digital_route {
            return Some("upload response on a non-digital case");
        }
        if event_type == NotifiableEventType::DwpResponseReceived && case.created_via_digital_route
        {
            return Some("paper response on a digital case");
        }
        if !self.hearing_notifications_enabled
            && matches!(
                event_type,
                NotifiableEventType::HearingBooked | NotifiableEventType::HearingReminder
            )
        {
            return Some("hearing notifications disabled by feature flag");
        }
        None
    }
}
