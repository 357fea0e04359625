//! Record population from parsed element nodes
//!
//! Each record type knows the element it is built from ([`Populate::TAG`]) and
//! carries a field table ([`FieldTable::assign`]) mapping a normalised child or
//! attribute name to its coercion. Nested records (`SSID`, `packets`,
//! `snr-info`, `gps-info`, `seen-card`, `wireless-client`) are built
//! recursively; repeated `freqmhz` and `encryption` elements append. Unknown
//! elements are skipped so newer capture tools do not break parsing.

use log::trace;

use super::coerce::{self, CoerceError};
use super::node::Node;
use super::tag::normalize_field_name;
use crate::constants;
use crate::error::{NetXmlError, Result};
use crate::models::{
    CardSource, Client, Network, PacketCounts, PositionInfo, Security, SeenCard, SignalInfo,
};

/// How an element's own tag is compared against [`Populate::TAG`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMatch {
    Exact,
    /// Capture tools disagree on case (`SSID`/`ssid`, `packets`/`PACKETS`)
    IgnoreCase,
}

/// Typed assignment of a single named field
pub trait FieldTable {
    /// Set `field` from `value`; returns `false` when the name is not a field
    /// of this record.
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool>;
}

/// Construction of a record from the element it describes
pub trait Populate: FieldTable + Default {
    const TAG: &'static str;
    const TAG_MATCH: TagMatch = TagMatch::Exact;
    /// Whether child tags are lower-cased before lookup
    const LOWERCASE_CHILDREN: bool = false;

    /// Fill the record from `node`.
    ///
    /// Fails with [`NetXmlError::TagMismatch`] when `node` is not a `TAG`
    /// element.
    fn populate(&mut self, node: &Node) -> Result<()> {
        expect_tag::<Self>(node)?;
        assign_attributes(self, node)?;
        for child in &node.children {
            let field = child_field_name(child, Self::LOWERCASE_CHILDREN);
            assign_or_skip(self, &field, child, node)?;
        }
        Ok(())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let mut record = Self::default();
        record.populate(node)?;
        Ok(record)
    }
}

fn expect_tag<T: Populate>(node: &Node) -> Result<()> {
    let found = node.local_name();
    let matches = match T::TAG_MATCH {
        TagMatch::Exact => found == T::TAG,
        TagMatch::IgnoreCase => found.eq_ignore_ascii_case(T::TAG),
    };
    if matches {
        Ok(())
    } else {
        Err(NetXmlError::TagMismatch {
            expected: T::TAG,
            found: found.to_string(),
        })
    }
}

fn child_field_name(child: &Node, lowercase: bool) -> String {
    let local = child.local_name();
    if lowercase {
        normalize_field_name(&local.to_lowercase())
    } else {
        normalize_field_name(local)
    }
}

fn assign_attributes<T: FieldTable>(record: &mut T, node: &Node) -> Result<()> {
    for (key, value) in &node.attributes {
        record.assign(&normalize_field_name(key), Some(value))?;
    }
    Ok(())
}

fn assign_or_skip<T: FieldTable>(record: &mut T, field: &str, child: &Node, parent: &Node) -> Result<()> {
    if !record.assign(field, child.text())? {
        trace!("ignoring <{}> inside <{}>", child.local_name(), parent.local_name());
    }
    Ok(())
}

fn float(field: &str, value: Option<&str>) -> Result<Option<f64>> {
    coerce::to_float(value).map_err(|e| NetXmlError::coerce(field, e))
}

fn timestamp(field: &str, value: Option<&str>) -> Result<Option<chrono::NaiveDateTime>> {
    coerce::to_timestamp(value).map_err(|e: CoerceError| NetXmlError::coerce(field, e))
}

fn push_text(list: &mut Vec<String>, node: &Node) {
    if let Some(text) = node.text() {
        list.push(text.to_string());
    }
}

impl FieldTable for PacketCounts {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        let slot = match field {
            "llc" => &mut self.llc,
            "data" => &mut self.data,
            "crypt" => &mut self.crypt,
            "total" => &mut self.total,
            "fragments" => &mut self.fragments,
            "retries" => &mut self.retries,
            _ => return Ok(false),
        };
        *slot = coerce::to_integer(value);
        Ok(true)
    }
}

impl Populate for PacketCounts {
    const TAG: &'static str = "packets";
    const TAG_MATCH: TagMatch = TagMatch::IgnoreCase;
    const LOWERCASE_CHILDREN: bool = true;
}

impl FieldTable for SignalInfo {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        let slot = match field {
            "last_signal_dbm" => &mut self.last_signal_dbm,
            "last_noise_dbm" => &mut self.last_noise_dbm,
            "last_signal_rssi" => &mut self.last_signal_rssi,
            "last_noise_rssi" => &mut self.last_noise_rssi,
            "min_signal_dbm" => &mut self.min_signal_dbm,
            "min_noise_dbm" => &mut self.min_noise_dbm,
            "min_signal_rssi" => &mut self.min_signal_rssi,
            "min_noise_rssi" => &mut self.min_noise_rssi,
            "max_signal_dbm" => &mut self.max_signal_dbm,
            "max_noise_dbm" => &mut self.max_noise_dbm,
            "max_signal_rssi" => &mut self.max_signal_rssi,
            "max_noise_rssi" => &mut self.max_noise_rssi,
            _ => return Ok(false),
        };
        *slot = coerce::to_integer(value);
        Ok(true)
    }
}

impl Populate for SignalInfo {
    const TAG: &'static str = "snr-info";
}

impl FieldTable for PositionInfo {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        let slot = match field {
            "min_lat" => &mut self.min_lat,
            "min_lon" => &mut self.min_lon,
            "min_alt" => &mut self.min_alt,
            "min_spd" => &mut self.min_spd,
            "max_lat" => &mut self.max_lat,
            "max_lon" => &mut self.max_lon,
            "max_alt" => &mut self.max_alt,
            "max_spd" => &mut self.max_spd,
            "peak_lat" => &mut self.peak_lat,
            "peak_lon" => &mut self.peak_lon,
            "peak_alt" => &mut self.peak_alt,
            "avg_lat" => &mut self.avg_lat,
            "avg_lon" => &mut self.avg_lon,
            "avg_alt" => &mut self.avg_alt,
            _ => return Ok(false),
        };
        *slot = float(field, value)?;
        Ok(true)
    }
}

impl Populate for PositionInfo {
    const TAG: &'static str = "gps-info";
}

impl FieldTable for CardSource {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        match field {
            "uuid" => self.uuid = coerce::to_string(value),
            "card_name" => self.card_name = coerce::to_string(value),
            "card_interface" => self.card_interface = coerce::to_string(value),
            "card_type" => self.card_type = coerce::to_string(value),
            "card_packets" => self.card_packets = coerce::to_integer(value),
            "card_hop" => self.card_hop = coerce::to_boolean(value),
            "card_channels" => self.card_channels = coerce::to_string(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Populate for CardSource {
    const TAG: &'static str = constants::CARD_SOURCE_TAG;
}

impl FieldTable for SeenCard {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        match field {
            "seen_uuid" => self.seen_uuid = coerce::to_string(value),
            "seen_time" => self.seen_time = timestamp(field, value)?,
            "seen_packets" => self.seen_packets = coerce::to_integer(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Populate for SeenCard {
    const TAG: &'static str = "seen-card";
}

impl FieldTable for Security {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        match field {
            "first_time" => self.first_time = timestamp(field, value)?,
            "last_time" => self.last_time = timestamp(field, value)?,
            "frame_type" => self.frame_type = coerce::to_string(value),
            "max_rate" => self.max_rate = float(field, value)?,
            "packets" => self.packets = coerce::to_integer(value),
            "beaconrate" => self.beaconrate = coerce::to_integer(value),
            "info" => self.info = coerce::to_string(value),
            "essid" => self.essid = coerce::to_string(value),
            "cloaked" => self.cloaked = coerce::to_boolean(value),
            "wpa_version" => self.wpa_version = coerce::to_string(value),
            "wps" => self.wps = coerce::to_string(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Populate for Security {
    const TAG: &'static str = "SSID";
    const TAG_MATCH: TagMatch = TagMatch::IgnoreCase;

    /// Reads the SSID fields and encryption tokens, then classifies once the
    /// token list is complete.
    fn populate(&mut self, node: &Node) -> Result<()> {
        expect_tag::<Self>(node)?;
        assign_attributes(self, node)?;

        for child in &node.children {
            let mut field = child_field_name(child, false);
            // <type>, <frame-type> and friends all describe the frame kind
            if field.contains("type") {
                field = "frame_type".to_string();
            }
            match field.as_str() {
                "essid" => {
                    self.cloaked = match child.attribute("cloaked") {
                        Some(flag) => coerce::to_boolean(Some(flag)),
                        None => Some(false),
                    };
                    self.essid = coerce::to_string(child.text());
                }
                "ssid" => self.essid = coerce::to_string(child.text()),
                "encryption" => push_text(&mut self.encryption, child),
                _ => assign_or_skip(self, &field, child, node)?,
            }
        }

        self.classify();
        Ok(())
    }
}

impl FieldTable for Network {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        match field {
            "number" => self.number = coerce::to_integer(value),
            "type" => self.network_type = coerce::to_string(value),
            "first_time" => self.first_time = timestamp(field, value)?,
            "last_time" => self.last_time = timestamp(field, value)?,
            "bssid" => self.bssid = coerce::to_string(value),
            "bsstimestamp" => self.bsstimestamp = coerce::to_string(value),
            "carrier" => self.carrier = coerce::to_string(value),
            "cdp_device" => self.cdp_device = coerce::to_string(value),
            "cdp_portid" => self.cdp_portid = coerce::to_string(value),
            "channel" => self.channel = coerce::to_integer(value),
            "datasize" => self.datasize = coerce::to_integer(value),
            "encoding" => self.encoding = coerce::to_string(value),
            "manuf" => self.manuf = coerce::to_string(value),
            "maxseenrate" => self.maxseenrate = coerce::to_integer(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Populate for Network {
    const TAG: &'static str = constants::NETWORK_TAG;
    const LOWERCASE_CHILDREN: bool = true;

    /// Attributes are read first so nested clients see the network number.
    fn populate(&mut self, node: &Node) -> Result<()> {
        expect_tag::<Self>(node)?;
        assign_attributes(self, node)?;

        let mut security = None;
        for child in &node.children {
            let field = child_field_name(child, Self::LOWERCASE_CHILDREN);
            match field.as_str() {
                "ssid" => security = Some(Security::from_node(child)?),
                "packets" => self.packets = Some(PacketCounts::from_node(child)?),
                "snr_info" => self.snr = Some(SignalInfo::from_node(child)?),
                "gps_info" => self.gps = Some(PositionInfo::from_node(child)?),
                "seen_card" => self.seen_cards.push(SeenCard::from_node(child)?),
                "wireless_client" => self.clients.push(Client::with_parent(child, self.number)?),
                "freqmhz" => push_text(&mut self.freqmhz, child),
                _ => assign_or_skip(self, &field, child, node)?,
            }
        }

        self.security = security.unwrap_or_default();
        Ok(())
    }
}

impl FieldTable for Client {
    fn assign(&mut self, field: &str, value: Option<&str>) -> Result<bool> {
        match field {
            "number" => self.number = coerce::to_integer(value),
            "type" => self.client_type = coerce::to_string(value),
            "first_time" => self.first_time = timestamp(field, value)?,
            "last_time" => self.last_time = timestamp(field, value)?,
            "client_mac" => self.client_mac = coerce::to_string(value),
            "client_manuf" => self.client_manuf = coerce::to_string(value),
            "carrier" => self.carrier = coerce::to_string(value),
            "cdp_device" => self.cdp_device = coerce::to_string(value),
            "cdp_portid" => self.cdp_portid = coerce::to_string(value),
            "channel" => self.channel = coerce::to_integer(value),
            "datasize" => self.datasize = coerce::to_integer(value),
            "encoding" => self.encoding = coerce::to_string(value),
            "maxseenrate" => self.maxseenrate = coerce::to_integer(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Populate for Client {
    const TAG: &'static str = constants::CLIENT_TAG;
    const LOWERCASE_CHILDREN: bool = true;

    fn populate(&mut self, node: &Node) -> Result<()> {
        expect_tag::<Self>(node)?;
        assign_attributes(self, node)?;

        let mut security = None;
        for child in &node.children {
            let field = child_field_name(child, Self::LOWERCASE_CHILDREN);
            match field.as_str() {
                "ssid" => security = Some(Security::from_node(child)?),
                "packets" => self.packets = Some(PacketCounts::from_node(child)?),
                "snr_info" => self.snr = Some(SignalInfo::from_node(child)?),
                "gps_info" => self.gps = Some(PositionInfo::from_node(child)?),
                "seen_card" => self.seen_cards.push(SeenCard::from_node(child)?),
                "freqmhz" => push_text(&mut self.freqmhz, child),
                _ => assign_or_skip(self, &field, child, node)?,
            }
        }

        self.security = security.unwrap_or_default();
        Ok(())
    }
}

impl Client {
    /// Build a client nested in the network numbered `network_number`.
    pub fn with_parent(node: &Node, network_number: Option<i64>) -> Result<Self> {
        let mut client = Client {
            network_number,
            ..Client::default()
        };
        client.populate(node)?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn leaf(tag: &str, text: &str) -> Node {
        Node::new(tag).with_text(text)
    }

    #[test]
    fn test_packets_lowercases_children_and_tag() {
        let node = Node::new("PACKETS")
            .with_child(leaf("LLC", "12"))
            .with_child(leaf("data", "30"))
            .with_child(leaf("crypt", "lots"))
            .with_child(leaf("total", "42"));

        let packets = PacketCounts::from_node(&node).unwrap();
        assert_eq!(packets.llc, Some(12));
        assert_eq!(packets.data, Some(30));
        assert_eq!(packets.crypt, None);
        assert_eq!(packets.total, Some(42));
        assert_eq!(packets.retries, None);
    }

    #[test]
    fn test_wrong_tag_is_fatal() {
        let err = SignalInfo::from_node(&Node::new("gps-info")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert!(matches!(
            err,
            NetXmlError::TagMismatch { expected: "snr-info", ref found } if found == "gps-info"
        ));
    }

    #[test]
    fn test_signal_info_hyphenated_children() {
        let node = Node::new("snr-info")
            .with_child(leaf("last_signal_dbm", "-67"))
            .with_child(leaf("min-noise-dbm", "-95"))
            .with_child(leaf("max_signal_rssi", "n/a"));

        let snr = SignalInfo::from_node(&node).unwrap();
        assert_eq!(snr.last_signal_dbm, Some(-67));
        assert_eq!(snr.min_noise_dbm, Some(-95));
        assert_eq!(snr.max_signal_rssi, None);
    }

    #[test]
    fn test_gps_malformed_float_is_format_error() {
        let node = Node::new("gps-info").with_child(leaf("avg-lat", "south"));
        let err = PositionInfo::from_node(&node).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("avg_lat"));
    }

    #[test]
    fn test_security_reads_essid_and_classifies() {
        let node = Node::new("SSID")
            .with_attribute("first-time", "Wed May  6 08:23:31 2015")
            .with_child(leaf("type", "Beacon"))
            .with_child(leaf("max-rate", "54.000000"))
            .with_child(leaf("packets", "17"))
            .with_child(leaf("encryption", "WPA+TKIP"))
            .with_child(leaf("encryption", "WPA+PSK"))
            .with_child(leaf("encryption", "WPA+PSK"))
            .with_child(leaf("wpa-version", "WPA"))
            .with_child(leaf("essid", "HomeNet").with_attribute("cloaked", "false"));

        let security = Security::from_node(&node).unwrap();
        assert!(security.first_time.is_some());
        assert_eq!(security.frame_type.as_deref(), Some("Beacon"));
        assert_eq!(security.max_rate, Some(54.0));
        assert_eq!(security.packets, Some(17));
        assert_eq!(security.encryption, vec!["WPA+TKIP", "WPA+PSK", "WPA+PSK"]);
        assert_eq!(security.essid.as_deref(), Some("HomeNet"));
        assert_eq!(security.cloaked, Some(false));
        assert_eq!(security.privacy(), Some("WPA"));
        assert_eq!(security.cipher(), Some("TKIP"));
        assert_eq!(security.authentication(), Some("PSK"));
    }

    #[test]
    fn test_security_cloaked_empty_essid() {
        let node = Node::new("SSID")
            .with_child(Node::new("essid").with_attribute("cloaked", "true"));

        let security = Security::from_node(&node).unwrap();
        assert_eq!(security.essid, None);
        assert_eq!(security.cloaked, Some(true));
        assert_eq!(security.privacy(), Some("UNKNOWN"));
    }

    #[test]
    fn test_security_missing_cloaked_attribute_means_visible() {
        let node = Node::new("SSID").with_child(leaf("essid", "Visible"));
        assert_eq!(Security::from_node(&node).unwrap().cloaked, Some(false));
    }

    #[test]
    fn test_network_without_ssid_gets_empty_security() {
        let node = Node::new("wireless-network")
            .with_attribute("number", "3")
            .with_child(leaf("BSSID", "00:1A:2B:3C:4D:5E"));

        let network = Network::from_node(&node).unwrap();
        assert_eq!(network.number, Some(3));
        assert_eq!(network.bssid.as_deref(), Some("00:1A:2B:3C:4D:5E"));
        assert_eq!(network.security, Security::default());
        assert!(network.security.privacy().is_none());
    }

    #[test]
    fn test_network_attributes_and_scalars() {
        let node = Node::new("wireless-network")
            .with_attribute("number", "1")
            .with_attribute("type", "infrastructure")
            .with_attribute("first-time", "Wed May  6 08:23:31 2015")
            .with_attribute("last-time", "Wed May  6 08:40:02 2015")
            .with_child(leaf("manuf", "Cisco"))
            .with_child(leaf("channel", "6"))
            .with_child(leaf("maxseenrate", "54000"))
            .with_child(leaf("datasize", "bogus"))
            .with_child(leaf("freqmhz", "2437 120"))
            .with_child(leaf("freqmhz", "2442 3"))
            .with_child(leaf("freqmhz", "2437 120"))
            .with_child(leaf("future-extension", "ignored"));

        let network = Network::from_node(&node).unwrap();
        assert_eq!(network.network_type.as_deref(), Some("infrastructure"));
        assert!(network.first_time.unwrap() < network.last_time.unwrap());
        assert_eq!(network.manuf.as_deref(), Some("Cisco"));
        assert_eq!(network.channel, Some(6));
        assert_eq!(network.maxseenrate, Some(54000));
        assert_eq!(network.datasize, None);
        assert_eq!(network.freqmhz, vec!["2437 120", "2442 3", "2437 120"]);
    }

    #[test]
    fn test_network_malformed_timestamp_attribute_fails() {
        let node = Node::new("wireless-network").with_attribute("first-time", "not a time");
        let err = Network::from_node(&node).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_nested_clients_get_back_reference() {
        let client = Node::new("wireless-client")
            .with_attribute("number", "1")
            .with_attribute("type", "fromds")
            .with_child(leaf("client-mac", "AA:BB:CC:DD:EE:FF"))
            .with_child(Node::new("packets").with_child(leaf("total", "9")));
        let node = Node::new("wireless-network")
            .with_attribute("number", "12")
            .with_child(client.clone())
            .with_child(client);

        let network = Network::from_node(&node).unwrap();
        assert_eq!(network.clients.len(), 2);
        for client in &network.clients {
            assert_eq!(client.network_number, Some(12));
            assert_eq!(client.client_type.as_deref(), Some("fromds"));
            assert_eq!(client.client_mac.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
            assert_eq!(client.packets.as_ref().and_then(|p| p.total), Some(9));
            assert_eq!(client.security, Security::default());
        }
    }

    #[test]
    fn test_client_with_own_ssid_is_classified() {
        let node = Node::new("wireless-client")
            .with_attribute("number", "3")
            .with_attribute("first-time", "Wed May  6 08:24:10 2015")
            .with_attribute("last-time", "Wed May  6 08:40:55 2015")
            .with_child(
                Node::new("SSID")
                    .with_child(leaf("type", "Probe Request"))
                    .with_child(leaf("encryption", "WPA+TKIP"))
                    .with_child(leaf("wpa-version", "WPA"))
                    .with_child(leaf("ssid", "HomeNet")),
            );

        let client = Client::with_parent(&node, Some(1)).unwrap();
        assert!(client.first_time.unwrap() < client.last_time.unwrap());
        assert_eq!(client.security.frame_type.as_deref(), Some("Probe Request"));
        assert_eq!(client.security.essid.as_deref(), Some("HomeNet"));
        assert_eq!(client.security.privacy(), Some("WPA"));
        assert_eq!(client.security.cipher(), Some("TKIP"));
        assert_eq!(client.security.authentication(), Some("PSK"));
    }

    #[test]
    fn test_client_with_parent_checks_tag() {
        let err = Client::with_parent(&Node::new("wireless-network"), Some(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn test_seen_cards_attach_to_network() {
        let node = Node::new("wireless-network").with_child(
            Node::new("seen-card")
                .with_child(leaf("seen-uuid", "c0ffee00-0000-0000-0000-000000000001"))
                .with_child(leaf("seen-time", "Wed May  6 08:23:31 2015"))
                .with_child(leaf("seen-packets", "88")),
        );

        let network = Network::from_node(&node).unwrap();
        assert_eq!(network.seen_cards.len(), 1);
        assert_eq!(network.seen_cards[0].seen_packets, Some(88));
        assert!(network.seen_cards[0].seen_time.is_some());
    }

    #[test]
    fn test_card_source_fields() {
        let node = Node::new("card-source")
            .with_attribute("uuid", "c0ffee00-0000-0000-0000-000000000001")
            .with_child(leaf("card-name", "wlan0mon"))
            .with_child(leaf("card-interface", "wlan0mon"))
            .with_child(leaf("card-type", "mac80211"))
            .with_child(leaf("card-packets", "15012"))
            .with_child(leaf("card-hop", "true"))
            .with_child(leaf("card-channels", "1,6,11"));

        let card = CardSource::from_node(&node).unwrap();
        assert_eq!(card.uuid.as_deref(), Some("c0ffee00-0000-0000-0000-000000000001"));
        assert_eq!(card.card_name.as_deref(), Some("wlan0mon"));
        assert_eq!(card.card_packets, Some(15012));
        assert_eq!(card.card_hop, Some(true));
        assert_eq!(card.card_channels.as_deref(), Some("1,6,11"));
    }

    #[test]
    fn test_namespaced_children_are_matched_by_local_name() {
        let node = Node::new("{urn:kismet}wireless-network")
            .with_child(leaf("{urn:kismet}channel", "11"))
            .with_child(
                Node::new("{urn:kismet}SSID").with_child(leaf("{urn:kismet}encryption", "WEP")),
            );

        let network = Network::from_node(&node).unwrap();
        assert_eq!(network.channel, Some(11));
        assert_eq!(network.security.cipher(), Some("WEP"));
    }
}
