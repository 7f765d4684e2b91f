//! Notifiable case-event vocabulary and routing lists.
//!
//! Each variant carries the per-event routing properties as predicate
//! methods rather than external lookup tables, so the compiler checks that
//! a new event type gets a decision in every list.

use std::fmt;

use serde::{Deserialize, Serialize};

use notify_core::types::EventId;

use crate::case::{CaseSnapshot, DocumentType, HearingType};

/// A discrete case lifecycle trigger that may require notifying parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotifiableEventType {
    AppealReceived,
    ValidAppealCreated,
    NonCompliant,
    DraftToValidAppealCreated,
    DraftToNonCompliant,
    EvidenceReceived,
    DwpResponseReceived,
    DwpUploadResponse,
    UpdateOtherPartyData,
    HearingBooked,
    HearingReminder,
    Postponement,
    RequestForInformation,
    SubscriptionUpdated,
    DecisionIssued,
    DirectionIssued,
    IssueFinalDecision,
    IssueAdjournmentNotice,
    ReissueDocument,
    ProcessAudioVideo,
    ActionPostponementRequest,
    SetAsideRequest,
    CorrectionRequest,
    StatementOfReasonsRequest,
    LibertyToApplyRequest,
    AppealLapsed,
    AppealWithdrawn,
    AppealDormant,
    StruckOut,
}

impl NotifiableEventType {
    /// Upstream identifier of the event type.
    pub fn id(&self) -> &'static str {
        match self {
            Self::AppealReceived => "appealReceived",
            Self::ValidAppealCreated => "validAppealCreated",
            Self::NonCompliant => "nonCompliant",
            Self::DraftToValidAppealCreated => "draftToValidAppealCreated",
            Self::DraftToNonCompliant => "draftToNonCompliant",
            Self::EvidenceReceived => "evidenceReceived",
            Self::DwpResponseReceived => "dwpResponseReceived",
            Self::DwpUploadResponse => "dwpUploadResponse",
            Self::UpdateOtherPartyData => "updateOtherPartyData",
            Self::HearingBooked => "hearingBooked",
            Self::HearingReminder => "hearingReminder",
            Self::Postponement => "postponement",
            Self::RequestForInformation => "requestForInformation",
            Self::SubscriptionUpdated => "subscriptionUpdated",
            Self::DecisionIssued => "decisionIssued",
            Self::DirectionIssued => "directionIssued",
            Self::IssueFinalDecision => "issueFinalDecision",
            Self::IssueAdjournmentNotice => "issueAdjournmentNotice",
            Self::ReissueDocument => "reissueDocument",
            Self::ProcessAudioVideo => "processAudioVideo",
            Self::ActionPostponementRequest => "actionPostponementRequest",
            Self::SetAsideRequest => "setAsideRequest",
            Self::CorrectionRequest => "correctionRequest",
            Self::StatementOfReasonsRequest => "statementOfReasonsRequest",
            Self::LibertyToApplyRequest => "libertyToApplyRequest",
            Self::AppealLapsed => "appealLapsed",
            Self::AppealWithdrawn => "appealWithdrawn",
            Self::AppealDormant => "appealDormant",
            Self::StruckOut => "struckOut",
        }
    }

    /// Whether this event may fire outside the permitted delivery window.
    ///
    /// Letter-only events go by post anyway, so deferring them buys
    /// nothing.
    pub fn allow_out_of_hours(&self) -> bool {
        matches!(
            self,
            Self::DecisionIssued
                | Self::DirectionIssued
                | Self::IssueFinalDecision
                | Self::IssueAdjournmentNotice
                | Self::ProcessAudioVideo
                | Self::ActionPostponementRequest
                | Self::ReissueDocument
                | Self::StruckOut
        )
    }

    /// Whether delivery of this event must be delayed by a fixed offset.
    pub fn is_delayed(&self) -> bool {
        self.delay_seconds() > 0
    }

    /// Fixed delay in seconds before this event's notifications go out.
    pub fn delay_seconds(&self) -> i64 {
        match self {
            // Gives the caseworker a window to void a freshly created
            // appeal before anyone is notified.
            Self::ValidAppealCreated | Self::DraftToValidAppealCreated => 300,
            Self::DwpUploadResponse => 300,
            _ => 0,
        }
    }

    /// Whether a letter must be sent for this event regardless of
    /// subscription state.
    pub fn is_mandatory_letter(&self) -> bool {
        matches!(
            self,
            Self::ValidAppealCreated
                | Self::NonCompliant
                | Self::RequestForInformation
                | Self::DecisionIssued
                | Self::DirectionIssued
                | Self::IssueFinalDecision
                | Self::IssueAdjournmentNotice
                | Self::ProcessAudioVideo
                | Self::ActionPostponementRequest
                | Self::AppealLapsed
                | Self::AppealWithdrawn
                | Self::StruckOut
        )
    }

    /// Whether this event may still notify once the case has gone dormant.
    pub fn is_dormant_allowed(&self) -> bool {
        matches!(
            self,
            Self::AppealLapsed
                | Self::AppealWithdrawn
                | Self::AppealDormant
                | Self::StruckOut
                | Self::DecisionIssued
                | Self::IssueFinalDecision
                | Self::IssueAdjournmentNotice
                | Self::SetAsideRequest
                | Self::CorrectionRequest
                | Self::StatementOfReasonsRequest
                | Self::LibertyToApplyRequest
        )
    }

    /// Whether this event type is excluded on Welsh-language cases.
    pub fn is_welsh_excluded(&self) -> bool {
        matches!(
            self,
            Self::HearingReminder | Self::Postponement | Self::UpdateOtherPartyData
        )
    }

    /// Whether this event's letter goes through the interlocutory path.
    pub fn is_interlocutory_letter(&self) -> bool {
        matches!(self, Self::RequestForInformation | Self::NonCompliant)
    }

    /// Whether this event's letter is a bundled (docmosis) letter combining
    /// a generated cover letter with an associated case document.
    pub fn is_bundled_letter(&self) -> bool {
        matches!(
            self,
            Self::DecisionIssued
                | Self::DirectionIssued
                | Self::IssueFinalDecision
                | Self::IssueAdjournmentNotice
                | Self::ProcessAudioVideo
                | Self::ActionPostponementRequest
        )
    }

    /// Whether this event is a further-evidence action raised by a party.
    /// Such events are suppressed when the original sender is the
    /// respondent or the tribunal itself.
    pub fn is_further_evidence_action(&self) -> bool {
        matches!(
            self,
            Self::SetAsideRequest
                | Self::CorrectionRequest
                | Self::StatementOfReasonsRequest
                | Self::LibertyToApplyRequest
        )
    }

    /// Whether this event only makes sense while a future hearing exists.
    pub fn requires_future_hearing(&self) -> bool {
        matches!(self, Self::HearingBooked | Self::HearingReminder)
    }

    /// Hearing formats for which this event may be delivered.
    pub fn permitted_hearing_types(&self) -> &'static [HearingType] {
        match self {
            Self::HearingBooked | Self::HearingReminder | Self::Postponement => {
                &[HearingType::Oral, HearingType::Online]
            }
            _ => &[HearingType::Oral, HearingType::Paper, HearingType::Online],
        }
    }

    /// Document type appended to this event's bundled letter, if any.
    pub fn document_type(&self) -> Option<DocumentType> {
        match self {
            Self::DecisionIssued => Some(DocumentType::DecisionNotice),
            Self::DirectionIssued => Some(DocumentType::DirectionNotice),
            Self::IssueFinalDecision => Some(DocumentType::FinalDecisionNotice),
            Self::IssueAdjournmentNotice => Some(DocumentType::AdjournmentNotice),
            Self::ProcessAudioVideo => Some(DocumentType::AudioVideoDirectionNotice),
            Self::ActionPostponementRequest => {
                Some(DocumentType::PostponementRequestDirectionNotice)
            }
            _ => None,
        }
    }

    /// Parse an upstream identifier back into an event type.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "appealReceived" => Some(Self::AppealReceived),
            "validAppealCreated" => Some(Self::ValidAppealCreated),
            "nonCompliant" => Some(Self::NonCompliant),
            "draftToValidAppealCreated" => Some(Self::DraftToValidAppealCreated),
            "draftToNonCompliant" => Some(Self::DraftToNonCompliant),
            "evidenceReceived" => Some(Self::EvidenceReceived),
            "dwpResponseReceived" => Some(Self::DwpResponseReceived),
            "dwpUploadResponse" => Some(Self::DwpUploadResponse),
            "updateOtherPartyData" => Some(Self::UpdateOtherPartyData),
            "hearingBooked" => Some(Self::HearingBooked),
            "hearingReminder" => Some(Self::HearingReminder),
            "postponement" => Some(Self::Postponement),
            "requestForInformation" => Some(Self::RequestForInformation),
            "subscriptionUpdated" => Some(Self::SubscriptionUpdated),
            "decisionIssued" => Some(Self::DecisionIssued),
            "directionIssued" => Some(Self::DirectionIssued),
            "issueFinalDecision" => Some(Self::IssueFinalDecision),
            "issueAdjournmentNotice" => Some(Self::IssueAdjournmentNotice),
            "reissueDocument" => Some(Self::ReissueDocument),
            "processAudioVideo" => Some(Self::ProcessAudioVideo),
            "actionPostponementRequest" => Some(Self::ActionPostponementRequest),
            "setAsideRequest" => Some(Self::SetAsideRequest),
            "correctionRequest" => Some(Self::CorrectionRequest),
            "statementOfReasonsRequest" => Some(Self::StatementOfReasonsRequest),
            "libertyToApplyRequest" => Some(Self::LibertyToApplyRequest),
            "appealLapsed" => Some(Self::AppealLapsed),
            "appealWithdrawn" => Some(Self::AppealWithdrawn),
            "appealDormant" => Some(Self::AppealDormant),
            "struckOut" => Some(Self::StruckOut),
            _ => None,
        }
    }

    /// Reissue document-selection codes remapped onto a concrete event
    /// type by the resolver's type override.
    pub fn from_reissue_code(code: &str) -> Option<Self> {
        match code {
            "issueFinalDecision" => Some(Self::IssueFinalDecision),
            "decisionIssued" => Some(Self::DecisionIssued),
            "directionIssued" => Some(Self::DirectionIssued),
            "issueAdjournmentNotice" => Some(Self::IssueAdjournmentNotice),
            _ => None,
        }
    }
}

impl fmt::Display for NotifiableEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A concrete occurrence of a notifiable event on a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseEvent {
    pub id: EventId,
    pub event_type: NotifiableEventType,
    /// Set once the resolver has rewritten the type, so downstream stages
    /// never re-apply the override.
    #[serde(default)]
    pub overridden: bool,
}

impl CaseEvent {
    pub fn new(event_type: NotifiableEventType) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            overridden: false,
        }
    }
}

/// An event plus the case snapshots taken around it. `old` is absent on
/// events the platform raises without a prior state, and on re-entries
/// from the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseEventContext {
    pub event: CaseEvent,
    pub new: CaseSnapshot,
    #[serde(default)]
    pub old: Option<CaseSnapshot>,
}

impl CaseEventContext {
    pub fn new(event: CaseEvent, new: CaseSnapshot) -> Self {
        Self {
            event,
            new,
            old: None,
        }
    }

    pub fn with_old(mut self, old: CaseSnapshot) -> Self {
        self.old = Some(old);
        self
    }
}
