//! Letter recipient resolution and placeholder enrichment.
//!
//! The provider's letter templates resolve the postal address from a fixed
//! ordered set of line placeholders, with the recipient name on the first
//! line. Missing address segments must still be present as empty strings
//! or the template render fails.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use notify_entity::case::{CaseSnapshot, PostalAddress};
use notify_entity::placeholders;
use notify_entity::subscription::PartyType;

/// Name printed on the first address line for a recipient.
pub fn recipient_name(party: &PartyType, case: &CaseSnapshot) -> Option<String> {
    match party {
        PartyType::Appellant => Some(case.appellant.name.full_name()),
        PartyType::Appointee => case.appointee.as_ref().map(|p| p.name.full_name()),
        PartyType::Representative => case.representative.as_ref().map(|p| p.name.full_name()),
        PartyType::JointParty => case
            .joint_party
            .as_ref()
            .and_then(|j| j.details.as_ref())
            .map(|d| d.name.full_name()),
        PartyType::OtherParty(id) => other_party_name(id, case),
    }
}

fn other_party_name(id: &str, case: &CaseSnapshot) -> Option<String> {
    for party in &case.other_parties {
        if party.id == id {
            return Some(party.notifiable_details().name.full_name());
        }
        if let Some(appointee) = &party.appointee {
            if appointee.id == id {
                return Some(appointee.details.name.full_name());
            }
        }
        if let Some(representative) = &party.representative {
            if representative.id == id {
                return Some(representative.details.name.full_name());
            }
        }
    }
    None
}

/// Postal address a letter for this recipient is sent to.
pub fn recipient_address<'a>(party: &PartyType, case: &'a CaseSnapshot) -> Option<&'a PostalAddress> {
    match party {
        // An appointee receives the appellant's correspondence at their
        // own address.
        PartyType::Appellant => Some(&case.appellant.address),
        PartyType::Appointee => case.appointee.as_ref().map(|p| &p.address),
        PartyType::Representative => case.representative.as_ref().map(|p| &p.address),
        PartyType::JointParty => case.joint_party_address(),
        PartyType::OtherParty(id) => other_party_address(id, case),
    }
}

fn other_party_address<'a>(id: &str, case: &'a CaseSnapshot) -> Option<&'a PostalAddress> {
    for party in &case.other_parties {
        if party.id == id {
            return Some(&party.notifiable_details().address);
        }
        if let Some(appointee) = &party.appointee {
            if appointee.id == id {
                return Some(&appointee.details.address);
            }
        }
        if let Some(representative) = &party.representative {
            if representative.id == id {
                return Some(&representative.details.address);
            }
        }
    }
    None
}

/// Map a name and structured address onto the fixed line placeholders,
/// blank-padding lines the address does not fill.
pub fn address_placeholders(name: &str, address: &PostalAddress) -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert(placeholders::ADDRESS_LINE_1.to_owned(), name.to_owned());

    let lines: Vec<&String> = [&address.line1, &address.line2, &address.town, &address.county]
        .into_iter()
        .filter_map(|f| f.as_ref())
        .filter(|f| !f.trim().is_empty())
        .collect();
    for (index, key) in placeholders::ADDRESS_LINE_KEYS.iter().enumerate() {
        map.insert(
            (*key).to_owned(),
            lines.get(index).map(|l| (*l).clone()).unwrap_or_default(),
        );
    }
    map.insert(
        placeholders::POSTCODE.to_owned(),
        address
            .postcode
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned(),
    );
    map
}

/// Enrich a notification's placeholders ahead of a letter send.
pub fn enrich_letter_placeholders(
    map: &mut HashMap<String, String>,
    party: &PartyType,
    case: &CaseSnapshot,
    now: DateTime<Utc>,
    response_delay_seconds: i64,
) {
    let name = recipient_name(party, case).unwrap_or_default();
    map.insert(placeholders::NAME.to_owned(), name.clone());
    map.insert(placeholders::CASE_ID.to_owned(), case.case_id.to_string());
    map.insert(
        placeholders::APPELLANT_NAME.to_owned(),
        case.appellant.name.full_name(),
    );
    if let Some(joint) = case.joint_party.as_ref().and_then(|j| j.details.as_ref()) {
        map.insert(
            placeholders::JOINT_PARTY_NAME.to_owned(),
            joint.name.full_name(),
        );
    }
    if matches!(party, PartyType::Representative) {
        if let Some(representative) = &case.representative {
            map.insert(
                placeholders::REPRESENTATIVE_NAME.to_owned(),
                representative.name.full_name(),
            );
        }
    }
    if let Some(address) = recipient_address(party, case) {
        map.extend(address_placeholders(&name, address));
    }
    if !map.contains_key(placeholders::RESPOND_BY_DATE) {
        let respond_by = now + Duration::seconds(response_delay_seconds);
        map.insert(
            placeholders::RESPOND_BY_DATE.to_owned(),
            respond_by.format("%d %B %Y").to_string(),
        );
    }
}
