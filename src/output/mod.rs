//! Output formatting module
//!
//! Handles:
//! - Building the listing report from a parsed document
//! - Human-readable output (one line per network, clients indented)
//! - JSON output of the same report
//! - Summary statistics

use chrono::NaiveDateTime;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write;
use std::time::Duration;

use netxml::config::OutputSettings;
use netxml::filters::network_matches_filters;
use netxml::models::{CardSource, Client, Document, Network};

/// Summary statistics for one parse
#[derive(Debug, Clone, Serialize)]
pub struct ParseSummary {
    /// Networks in the document
    pub networks: usize,
    /// Networks that passed the ESSID filters
    pub listed: usize,
    /// Clients in the document, nested and orphaned
    pub clients: usize,
    /// Duration of the parse in milliseconds
    pub duration_ms: u64,
}

/// Complete output structure for JSON serialization
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport<'a> {
    pub source: Option<&'a str>,
    pub kismet_version: Option<&'a str>,
    pub start_time: Option<NaiveDateTime>,
    pub card_source: Option<&'a CardSource>,
    pub networks: Vec<Cow<'a, Network>>,
    pub orphan_clients: &'a [Client],
    pub summary: ParseSummary,
}

/// Select and shape the networks to list
pub fn build_report<'a>(
    document: &'a Document,
    settings: &OutputSettings,
    elapsed: Duration,
) -> ParseReport<'a> {
    let networks: Vec<Cow<'a, Network>> = document
        .networks
        .iter()
        .filter(|network| network_matches_filters(network, &settings.essid_filters))
        .map(|network| {
            if settings.include_clients {
                Cow::Borrowed(network)
            } else {
                Cow::Owned(Network {
                    clients: Vec::new(),
                    ..network.clone()
                })
            }
        })
        .collect();

    let orphan_clients: &[Client] = if settings.include_clients {
        &document.clients
    } else {
        &[]
    };

    ParseReport {
        source: document.name.as_deref(),
        kismet_version: document.kismet_version.as_deref(),
        start_time: document.start_time,
        card_source: document.card_source.as_ref(),
        summary: ParseSummary {
            networks: document.network_count(),
            listed: networks.len(),
            clients: document.client_count(),
            duration_ms: elapsed.as_millis() as u64,
        },
        networks,
        orphan_clients,
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// `number  bssid  essid  privacy` for one network
pub fn format_network_line(network: &Network) -> String {
    let number = network
        .number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let essid = match network.essid() {
        Some(essid) => essid,
        None if network.security.cloaked == Some(true) => "<cloaked>",
        None => "<unnamed>",
    };
    format!(
        "{:>4}  {:<17}  {:<32}  {}",
        number,
        or_dash(network.bssid.as_deref()),
        essid,
        or_dash(network.security.privacy()),
    )
}

pub fn format_client_line(client: &Client) -> String {
    let mut line = format!("        client {}", or_dash(client.client_mac.as_deref()));
    if let Some(manuf) = &client.client_manuf {
        let _ = write!(line, " ({})", manuf);
    }
    if let Some(channel) = client.channel {
        let _ = write!(line, " ch {}", channel);
    }
    line
}

/// Render the report in human-readable format
pub fn format_human(report: &ParseReport) -> String {
    let mut out = String::new();

    let _ = write!(out, "Capture: {}", or_dash(report.source));
    if let Some(version) = report.kismet_version {
        let _ = write!(out, " (kismet {})", version);
    }
    if let Some(start) = report.start_time {
        let _ = write!(out, ", started {}", start);
    }
    out.push('\n');
    if let Some(card) = report.card_source {
        let _ = writeln!(
            out,
            "Card source: {} ({})",
            or_dash(card.card_name.as_deref()),
            or_dash(card.card_type.as_deref())
        );
    }
    out.push('\n');

    if report.networks.is_empty() {
        out.push_str("No networks found.\n");
    }
    for network in &report.networks {
        out.push_str(&format_network_line(network));
        out.push('\n');
        for client in &network.clients {
            out.push_str(&format_client_line(client));
            out.push('\n');
        }
    }
    if !report.orphan_clients.is_empty() {
        out.push_str("Clients outside any network:\n");
        for client in report.orphan_clients {
            out.push_str(&format_client_line(client));
            out.push('\n');
        }
    }

    let summary = &report.summary;
    out.push_str("\nParse Summary:\n");
    if summary.listed == summary.networks {
        let _ = writeln!(out, "  Networks: {}", summary.networks);
    } else {
        let _ = writeln!(out, "  Networks: {} ({} listed)", summary.networks, summary.listed);
    }
    let _ = writeln!(out, "  Clients: {}", summary.clients);

    let duration_sec = summary.duration_ms as f64 / 1000.0;
    if duration_sec < 1.0 {
        let _ = writeln!(out, "  Duration: {}ms", summary.duration_ms);
    } else {
        let _ = writeln!(out, "  Duration: {:.2}s", duration_sec);
    }

    out
}
