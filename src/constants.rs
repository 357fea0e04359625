//! Global constants for netxml
//!
//! Element names of the NetXML schema and application-wide identifiers

/// Root element written by Kismet and airodump-ng
pub const ROOT_TAG: &str = "detection-run";

pub const NETWORK_TAG: &str = "wireless-network";

pub const CLIENT_TAG: &str = "wireless-client";

pub const CARD_SOURCE_TAG: &str = "card-source";

/// File extension of NetXML captures (compared case-insensitively)
pub const NETXML_EXTENSION: &str = "netxml";

/// Application name, used for the binary and the configuration directory
pub const APP_NAME: &str = "netxml";

/// Configuration file looked up under the user's config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";
