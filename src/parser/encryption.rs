//! Privacy / cipher / authentication inference
//!
//! NetXML lists raw `<encryption>` tokens such as `WPA+PSK` or `WPA+AES-CCM`
//! with no fixed vocabulary. The classification walks an ordered list of
//! substring checks; the first match wins, so the order of [`CIPHER_RULES`]
//! is significant.

use serde::{Deserialize, Serialize};

/// Derived encryption description for a network or client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub privacy: String,
    pub cipher: String,
    pub authentication: String,
}

/// (token substring, cipher, authentication), checked in order
const CIPHER_RULES: &[(&str, &str, &str)] = &[
    ("AES-OCB", "AES-OCB", ""),
    ("AES-CCM", "AES-CCMP", "PSK"),
    ("TKIP", "TKIP", "PSK"),
    ("PSK", "TKIP", "PSK"),
    ("WEP", "WEP", "NONE"),
    ("None", "OPEN", "NONE"),
];

const UNKNOWN: &str = "UNKNOWN";

fn any_contains<S: AsRef<str>>(tokens: &[S], needle: &str) -> bool {
    tokens.iter().any(|token| token.as_ref().contains(needle))
}

/// Classify a token list, preferring an explicit `wpa-version` for privacy.
pub fn classify<S: AsRef<str>>(tokens: &[S], wpa_version: Option<&str>) -> Classification {
    let privacy = match wpa_version {
        Some(version) if !version.is_empty() => version,
        _ if any_contains(tokens, "WEP") => "WEP",
        _ if any_contains(tokens, "None") => "OPEN",
        _ => UNKNOWN,
    };

    let (cipher, authentication) = CIPHER_RULES
        .iter()
        .find(|(needle, _, _)| any_contains(tokens, needle))
        .map(|&(_, cipher, auth)| (cipher, auth))
        .unwrap_or((UNKNOWN, UNKNOWN));

    Classification {
        privacy: privacy.to_string(),
        cipher: cipher.to_string(),
        authentication: authentication.to_string(),
    }
}
