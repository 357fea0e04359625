//! Data models module
//!
//! Defines the typed NetXML records:
//! - Document: capture run metadata, networks, card source
//! - Network / Client: discovered access points and stations
//! - Security: raw SSID fields plus derived privacy/cipher/authentication
//! - PacketCounts, SignalInfo, PositionInfo: optional per-record statistics
//! - CardSource / SeenCard: capture hardware descriptions
//!
//! All scalar fields are typed and optional; absence means the capture did not
//! record the value, never zero or an empty string.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::parser::encryption::{self, Classification};

/// SSID / encryption configuration of a network or client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Security {
    pub first_time: Option<NaiveDateTime>,
    pub last_time: Option<NaiveDateTime>,
    /// Frame type the SSID was seen in (Beacon, Probe Response, ...)
    pub frame_type: Option<String>,
    pub max_rate: Option<f64>,
    pub packets: Option<i64>,
    pub beaconrate: Option<i64>,
    pub info: Option<String>,
    /// Broadcast name; `None` for cloaked or unnamed networks
    pub essid: Option<String>,
    pub cloaked: Option<bool>,
    pub wpa_version: Option<String>,
    pub wps: Option<String>,
    /// Raw `<encryption>` tokens in document order
    pub encryption: Vec<String>,
    #[serde(flatten)]
    classification: Option<Classification>,
}

impl Security {
    /// Derive privacy, cipher and authentication from the finished token list.
    pub fn classify(&mut self) {
        self.classification = Some(encryption::classify(
            &self.encryption,
            self.wpa_version.as_deref(),
        ));
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    pub fn privacy(&self) -> Option<&str> {
        self.classification.as_ref().map(|c| c.privacy.as_str())
    }

    pub fn cipher(&self) -> Option<&str> {
        self.classification.as_ref().map(|c| c.cipher.as_str())
    }

    pub fn authentication(&self) -> Option<&str> {
        self.classification.as_ref().map(|c| c.authentication.as_str())
    }
}

/// Frame counters; every counter is independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PacketCounts {
    pub llc: Option<i64>,
    pub data: Option<i64>,
    pub crypt: Option<i64>,
    pub total: Option<i64>,
    pub fragments: Option<i64>,
    pub retries: Option<i64>,
}

/// Signal and noise levels from `<snr-info>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalInfo {
    pub last_signal_dbm: Option<i64>,
    pub last_noise_dbm: Option<i64>,
    pub last_signal_rssi: Option<i64>,
    pub last_noise_rssi: Option<i64>,
    pub min_signal_dbm: Option<i64>,
    pub min_noise_dbm: Option<i64>,
    pub min_signal_rssi: Option<i64>,
    pub min_noise_rssi: Option<i64>,
    pub max_signal_dbm: Option<i64>,
    pub max_noise_dbm: Option<i64>,
    pub max_signal_rssi: Option<i64>,
    pub max_noise_rssi: Option<i64>,
}

/// GPS bounds and averages from `<gps-info>`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionInfo {
    pub min_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub min_alt: Option<f64>,
    pub min_spd: Option<f64>,
    pub max_lat: Option<f64>,
    pub max_lon: Option<f64>,
    pub max_alt: Option<f64>,
    pub max_spd: Option<f64>,
    pub peak_lat: Option<f64>,
    pub peak_lon: Option<f64>,
    pub peak_alt: Option<f64>,
    pub avg_lat: Option<f64>,
    pub avg_lon: Option<f64>,
    pub avg_alt: Option<f64>,
}

/// Capture interface that produced the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardSource {
    pub uuid: Option<String>,
    pub card_name: Option<String>,
    pub card_interface: Option<String>,
    pub card_type: Option<String>,
    pub card_packets: Option<i64>,
    pub card_hop: Option<bool>,
    pub card_channels: Option<String>,
}

/// A capture source that observed a network or client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeenCard {
    pub seen_uuid: Option<String>,
    pub seen_time: Option<NaiveDateTime>,
    pub seen_packets: Option<i64>,
}

/// A discovered access point or cell
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Network {
    /// Sequence number, unique within one document
    pub number: Option<i64>,
    pub network_type: Option<String>,
    pub first_time: Option<NaiveDateTime>,
    pub last_time: Option<NaiveDateTime>,
    pub bssid: Option<String>,
    pub bsstimestamp: Option<String>,
    pub carrier: Option<String>,
    pub cdp_device: Option<String>,
    pub cdp_portid: Option<String>,
    pub channel: Option<i64>,
    pub datasize: Option<i64>,
    pub encoding: Option<String>,
    pub manuf: Option<String>,
    pub maxseenrate: Option<i64>,
    /// Observed frequencies in discovery order
    pub freqmhz: Vec<String>,
    pub security: Security,
    pub packets: Option<PacketCounts>,
    pub snr: Option<SignalInfo>,
    pub gps: Option<PositionInfo>,
    pub seen_cards: Vec<SeenCard>,
    pub clients: Vec<Client>,
}

impl Network {
    pub fn essid(&self) -> Option<&str> {
        self.security.essid.as_deref()
    }

    /// Average (latitude, longitude), when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let gps = self.gps.as_ref()?;
        Some((gps.avg_lat?, gps.avg_lon?))
    }
}

/// A station seen talking to (or near) a network
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Client {
    pub number: Option<i64>,
    pub client_type: Option<String>,
    pub first_time: Option<NaiveDateTime>,
    pub last_time: Option<NaiveDateTime>,
    /// Sequence number of the owning network; a correlation key only
    pub network_number: Option<i64>,
    pub client_mac: Option<String>,
    pub client_manuf: Option<String>,
    pub carrier: Option<String>,
    pub cdp_device: Option<String>,
    pub cdp_portid: Option<String>,
    pub channel: Option<i64>,
    pub datasize: Option<i64>,
    pub encoding: Option<String>,
    pub maxseenrate: Option<i64>,
    pub freqmhz: Vec<String>,
    pub security: Security,
    pub packets: Option<PacketCounts>,
    pub snr: Option<SignalInfo>,
    pub gps: Option<PositionInfo>,
    pub seen_cards: Vec<SeenCard>,
}

/// A top-level record produced while reading a document
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    CardSource(CardSource),
    Network(Network),
    /// A client found outside any network element
    Client(Client),
}

/// A complete parsed NetXML document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// File name of the source document, when parsed from a path
    pub name: Option<String>,
    pub kismet_version: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub card_source: Option<CardSource>,
    pub networks: Vec<Network>,
    /// Clients that were not nested in any network
    pub clients: Vec<Client>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a record; a later card source replaces an earlier one.
    pub fn insert(&mut self, entry: Entry) {
        match entry {
            Entry::CardSource(card) => self.card_source = Some(card),
            Entry::Network(network) => self.networks.push(network),
            Entry::Client(client) => self.clients.push(client),
        }
    }

    /// Every network followed by its clients, then any orphaned clients.
    pub fn iter(&self) -> Records<'_> {
        Records {
            networks: self.networks.iter(),
            clients: [].iter(),
            orphans: self.clients.iter(),
        }
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Nested plus orphaned clients
    pub fn client_count(&self) -> usize {
        self.networks.iter().map(|n| n.clients.len()).sum::<usize>() + self.clients.len()
    }
}

/// Borrowed view of a network or client, as yielded by [`Records`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record<'a> {
    Network(&'a Network),
    Client(&'a Client),
}

impl<'a> Record<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Network(_) => "network",
            Record::Client(_) => "client",
        }
    }

    pub fn security(&self) -> &'a Security {
        match self {
            Record::Network(n) => &n.security,
            Record::Client(c) => &c.security,
        }
    }

    pub fn as_network(&self) -> Option<&'a Network> {
        match self {
            Record::Network(n) => Some(n),
            Record::Client(_) => None,
        }
    }

    pub fn as_client(&self) -> Option<&'a Client> {
        match self {
            Record::Client(c) => Some(c),
            Record::Network(_) => None,
        }
    }
}

/// Flattening iterator over a [`Document`]
#[derive(Debug, Clone)]
pub struct Records<'a> {
    networks: std::slice::Iter<'a, Network>,
    clients: std::slice::Iter<'a, Client>,
    orphans: std::slice::Iter<'a, Client>,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(client) = self.clients.next() {
            return Some(Record::Client(client));
        }
        if let Some(network) = self.networks.next() {
            self.clients = network.clients.iter();
            return Some(Record::Network(network));
        }
        self.orphans.next().map(Record::Client)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = Record<'a>;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
