//! Case snapshot as read from the case-management platform.
//!
//! A snapshot is a point-in-time view. Event handling always receives the
//! snapshot taken after the triggering event, and sometimes the one taken
//! before it as well.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notify_core::types::CaseId;

use crate::subscription::Subscription;

/// Lifecycle state of an appeal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseState {
    Draft,
    Incomplete,
    WithTribunal,
    ReadyToList,
    Hearing,
    DormantAppealState,
    VoidState,
}

impl CaseState {
    pub fn is_dormant(&self) -> bool {
        matches!(self, Self::DormantAppealState)
    }
}

/// Format of the hearing a party has elected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HearingType {
    Oral,
    Paper,
    Online,
}

/// Listing route the case is managed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HearingRoute {
    ListAssist,
    Gaps,
}

/// Language the party has asked to be contacted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguagePreference {
    #[default]
    English,
    Welsh,
}

/// Case document categories a bundled letter can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    DecisionNotice,
    DirectionNotice,
    FinalDecisionNotice,
    AdjournmentNotice,
    AudioVideoDirectionNotice,
    PostponementRequestDirectionNotice,
}

impl DocumentType {
    pub fn id(&self) -> &'static str {
        match self {
            Self::DecisionNotice => "decisionNotice",
            Self::DirectionNotice => "directionNotice",
            Self::FinalDecisionNotice => "finalDecisionNotice",
            Self::AdjournmentNotice => "adjournmentNotice",
            Self::AudioVideoDirectionNotice => "audioVideoDirectionNotice",
            Self::PostponementRequestDirectionNotice => "postponementRequestDirectionNotice",
        }
    }
}

/// Personal name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl Name {
    pub fn full_name(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => {
                format!("{} {} {}", title, self.first_name, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Postal address for letter delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl PostalAddress {
    /// A letter can only be posted when the first line and postcode exist.
    pub fn is_valid_for_letter(&self) -> bool {
        present(&self.line1) && present(&self.postcode)
    }

    /// Non-blank address lines in display order, postcode last.
    pub fn lines(&self) -> Vec<String> {
        [
            &self.line1,
            &self.line2,
            &self.town,
            &self.county,
            &self.postcode,
        ]
        .into_iter()
        .filter(|f| present(f))
        .filter_map(|f| f.clone())
        .collect()
    }
}

/// Identity and address of a notifiable party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDetails {
    pub name: Name,
    #[serde(default)]
    pub address: PostalAddress,
}

/// Joint party attached to the appellant's case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JointParty {
    #[serde(default)]
    pub details: Option<PartyDetails>,
    /// When set, letters to the joint party reuse the appellant's address.
    #[serde(default)]
    pub address_same_as_appellant: bool,
}

/// Appointee or representative attached to an other party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherPartyRole {
    pub id: String,
    pub details: PartyDetails,
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// A party to the case beyond the appellant's own side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherParty {
    pub id: String,
    pub details: PartyDetails,
    #[serde(default)]
    pub appointee: Option<OtherPartyRole>,
    #[serde(default)]
    pub representative: Option<OtherPartyRole>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    /// Set by the platform when the latest data change concerns this party.
    #[serde(default)]
    pub send_new_notification: bool,
}

impl OtherParty {
    /// The role that receives correspondence on this party's behalf: the
    /// appointee when one exists, otherwise the party directly.
    pub fn notifiable_details(&self) -> &PartyDetails {
        match &self.appointee {
            Some(appointee) => &appointee.details,
            None => &self.details,
        }
    }

    pub fn notifiable_subscription(&self) -> Option<&Subscription> {
        match &self.appointee {
            Some(appointee) => appointee.subscription.as_ref(),
            None => self.subscription.as_ref(),
        }
    }
}

/// A scheduled hearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hearing {
    pub id: String,
    pub hearing_date_time: DateTime<Utc>,
    #[serde(default)]
    pub venue_name: Option<String>,
}

/// Reissue selection captured on the case when a caseworker re-sends a
/// previously issued document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReissueSelection {
    /// Document-selection code naming which issued document to re-send.
    pub document_code: String,
    #[serde(default)]
    pub resend_to_appellant: bool,
    #[serde(default)]
    pub resend_to_representative: bool,
    /// Ids of other parties the reissue is directed at.
    #[serde(default)]
    pub other_party_resend_ids: Vec<String>,
}

/// A document held against the case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDocument {
    pub document_type: String,
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub added: Option<DateTime<Utc>>,
}

/// An entry in the case's event history, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub event_id: String,
    pub date: DateTime<Utc>,
}

/// Notice action recorded by a judge on an audio/video evidence request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioVideoAction {
    pub code: String,
}

impl AudioVideoAction {
    /// Actions that produce a direction notice letter.
    pub fn produces_notice(&self) -> bool {
        matches!(
            self.code.as_str(),
            "issueDirectionsNotice" | "excludeEvidence" | "admitEvidence"
        )
    }
}

/// Point-in-time view of an appeal and everyone attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSnapshot {
    pub case_id: CaseId,
    pub state: CaseState,
    pub appellant: PartyDetails,
    #[serde(default)]
    pub appointee: Option<PartyDetails>,
    #[serde(default)]
    pub representative: Option<PartyDetails>,
    #[serde(default)]
    pub joint_party: Option<JointParty>,
    #[serde(default)]
    pub other_parties: Vec<OtherParty>,
    #[serde(default)]
    pub appellant_subscription: Option<Subscription>,
    #[serde(default)]
    pub appointee_subscription: Option<Subscription>,
    #[serde(default)]
    pub representative_subscription: Option<Subscription>,
    #[serde(default)]
    pub joint_party_subscription: Option<Subscription>,
    #[serde(default)]
    pub language_preference: LanguagePreference,
    #[serde(default)]
    pub hearings: Vec<Hearing>,
    pub hearing_type: HearingType,
    pub hearing_route: HearingRoute,
    #[serde(default)]
    pub created_via_digital_route: bool,
    #[serde(default)]
    pub final_decision_issued: bool,
    /// Party that originated the latest further-evidence action.
    #[serde(default)]
    pub original_sender: Option<String>,
    #[serde(default)]
    pub audio_video_action: Option<AudioVideoAction>,
    #[serde(default)]
    pub reissue: Option<ReissueSelection>,
    #[serde(default)]
    pub documents: Vec<CaseDocument>,
    /// Event history, most recent first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// "yes" when the appellant has supplied the requested information.
    #[serde(default)]
    pub information_from_appellant: Option<String>,
}

impl CaseSnapshot {
    pub fn has_appointee(&self) -> bool {
        self.appointee.is_some()
    }

    pub fn has_representative(&self) -> bool {
        self.representative.is_some()
    }

    pub fn has_joint_party(&self) -> bool {
        self.joint_party.is_some()
    }

    /// Whether any hearing is scheduled strictly after `now`.
    pub fn has_future_hearing(&self, now: DateTime<Utc>) -> bool {
        self.hearings.iter().any(|h| h.hearing_date_time > now)
    }

    /// Latest case document of the given type, if one exists.
    pub fn latest_document_of_type(&self, document_type: &str) -> Option<&CaseDocument> {
        self.documents
            .iter()
            .filter(|d| d.document_type == document_type)
            .max_by_key(|d| d.added)
    }

    /// Address used for letters to the joint party.
    pub fn joint_party_address(&self) -> Option<&PostalAddress> {
        let joint = self.joint_party.as_ref()?;
        if joint.address_same_as_appellant {
            Some(&self.appellant.address)
        } else {
            joint.details.as_ref().map(|d| &d.address)
        }
    }
}
