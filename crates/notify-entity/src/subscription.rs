//! Party subscriptions to electronic channels.

use serde::{Deserialize, Serialize};

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// A party's opt-in to email and SMS notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub subscribe_email: bool,
    #[serde(default)]
    pub subscribe_sms: bool,
}

impl Subscription {
    /// Email is only live when the flag is set and an address exists.
    pub fn is_email_subscribed(&self) -> bool {
        self.subscribe_email && non_blank(&self.email)
    }

    /// SMS is only live when the flag is set and a number exists.
    pub fn is_sms_subscribed(&self) -> bool {
        self.subscribe_sms && non_blank(&self.mobile)
    }

    pub fn has_subscriptions(&self) -> bool {
        self.is_email_subscribed() || self.is_sms_subscribed()
    }

    /// Copy with channels selectively disabled. Used when re-sending the
    /// last event after a subscription update, so only the newly added
    /// channel fires.
    pub fn scrubbed(&self, keep_email: bool, keep_mobile: bool) -> Self {
        Self {
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            subscribe_email: self.subscribe_email && keep_email,
            subscribe_sms: self.subscribe_sms && keep_mobile,
        }
    }
}

/// Which party a subscription belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartyType {
    Appellant,
    Appointee,
    Representative,
    JointParty,
    /// Other party, carrying the platform-assigned party id.
    OtherParty(String),
}

impl PartyType {
    pub fn label(&self) -> &str {
        match self {
            Self::Appellant => "appellant",
            Self::Appointee => "appointee",
            Self::Representative => "representative",
            Self::JointParty => "jointParty",
            Self::OtherParty(_) => "otherParty",
        }
    }
}

/// A resolved subscription paired with the party it notifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionWithType {
    pub subscription: Subscription,
    pub party: PartyType,
}

impl SubscriptionWithType {
    pub fn new(subscription: Subscription, party: PartyType) -> Self {
        Self {
            subscription,
            party,
        }
    }
}
