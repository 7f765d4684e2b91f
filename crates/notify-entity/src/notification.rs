//! Resolved notification content and delivery outcomes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use notify_core::traits::ProviderReceipt;

/// Electronic and postal destinations for one recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
}

/// A fully resolved notification for a single recipient: which templates
/// apply on each channel, the placeholder values to render them with, and
/// where to send the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notification {
    pub destination: Destination,
    #[serde(default)]
    pub email_template: Option<String>,
    /// A single event can fan out to several SMS parts.
    #[serde(default)]
    pub sms_templates: Vec<String>,
    #[serde(default)]
    pub letter_template: Option<String>,
    #[serde(default)]
    pub docmosis_template: Option<String>,
    #[serde(default)]
    pub placeholders: HashMap<String, String>,
    /// Opaque reference echoed back by the provider for reconciliation.
    pub reference: String,
}

impl Notification {
    pub fn has_email_template(&self) -> bool {
        self.email_template.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_sms_template(&self) -> bool {
        self.sms_templates.iter().any(|t| !t.is_empty())
    }

    pub fn has_letter_template(&self) -> bool {
        self.letter_template.as_deref().is_some_and(|t| !t.is_empty())
            || self.docmosis_template.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Delivery channel, recorded on correspondence entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Email,
    Sms,
    Letter,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Letter => "letter",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was actually delivered for one recipient.
#[derive(Debug, Clone, Default)]
pub struct DeliveryOutcome {
    pub email_sent: bool,
    pub sms_sent: bool,
    pub letter_sent: bool,
    pub receipts: Vec<ProviderReceipt>,
}

impl DeliveryOutcome {
    pub fn anything_sent(&self) -> bool {
        self.email_sent || self.sms_sent || self.letter_sent
    }
}
