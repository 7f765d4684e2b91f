//! Delivery provider configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external notification provider, including the
/// allow-lists that divert sends to the test credential set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Hard page limit above which a bundled letter is diverted to bulk
    /// print instead of the provider's letter API.
    #[serde(default = "default_letter_page_limit")]
    pub letter_page_limit: usize,
    /// Email addresses routed to the test credential set.
    #[serde(default)]
    pub test_emails: Vec<String>,
    /// Domain suffix whose addresses are routed to the test credential set.
    #[serde(default = "default_test_email_domain")]
    pub test_email_domain: String,
    /// Mobile numbers routed to the test credential set.
    #[serde(default)]
    pub test_numbers: Vec<String>,
    /// Postcodes routed to the test credential set. A single `"*"` entry
    /// wildcards every postcode.
    #[serde(default)]
    pub test_postcodes: Vec<String>,
}

impl ProviderConfig {
    /// Whether an email address should use the test credential set.
    pub fn is_test_email(&self, address: &str) -> bool {
        self.test_emails.iter().any(|e| e == address)
            || address.ends_with(&self.test_email_domain)
    }

    /// Whether a mobile number should use the test credential set.
    pub fn is_test_number(&self, number: &str) -> bool {
        self.test_numbers.iter().any(|n| n == number)
    }

    /// Whether a postcode should use the test credential set.
    pub fn is_test_postcode(&self, postcode: &str) -> bool {
        self.test_postcodes.iter().any(|p| p == "*" || p == postcode)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            letter_page_limit: default_letter_page_limit(),
            test_emails: Vec::new(),
            test_email_domain: default_test_email_domain(),
            test_numbers: Vec::new(),
            test_postcodes: Vec::new(),
        }
    }
}

fn default_letter_page_limit() -> usize {
    10
}

fn default_test_email_domain() -> String {
    "@test.example.net".to_string()
}
