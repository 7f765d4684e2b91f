//! Placeholder key names used when rendering notification templates.
//!
//! Templates live with the provider; the engine only supplies values under
//! these keys. Key spellings are part of the template contract and must
//! not change without re-publishing the templates.

pub const CASE_ID: &str = "ccd_id";
pub const NAME: &str = "name";
pub const APPELLANT_NAME: &str = "appellant_name";
pub const REPRESENTATIVE_NAME: &str = "representative_name";
pub const JOINT_PARTY_NAME: &str = "joint_party_name";

/// Letter address block. The first line carries the recipient name and the
/// remaining lines carry the postal address, blank-padded so the template
/// always finds every key.
pub const ADDRESS_LINE_1: &str = "address_line_1";
pub const ADDRESS_LINE_2: &str = "address_line_2";
pub const ADDRESS_LINE_3: &str = "address_line_3";
pub const ADDRESS_LINE_4: &str = "address_line_4";
pub const ADDRESS_LINE_5: &str = "address_line_5";
pub const POSTCODE: &str = "postcode";

/// Date by which the recipient must respond to an information request.
pub const RESPOND_BY_DATE: &str = "respond_by_date";

/// Ordered keys for the padded letter address lines after the name line.
pub const ADDRESS_LINE_KEYS: [&str; 4] = [
    ADDRESS_LINE_2,
    ADDRESS_LINE_3,
    ADDRESS_LINE_4,
    ADDRESS_LINE_5,
];
