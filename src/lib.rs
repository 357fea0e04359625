//! netxml - NetXML wireless survey parsing library
//!
//! Reads Kismet / airodump-ng NetXML captures into a typed model of
//! networks, clients and their security, signal, packet and GPS records.
//!
//! ```no_run
//! let document = netxml::parse("Kismet-20150506-08-23-31-1.netxml")?;
//! for network in &document.networks {
//!     println!("{:?} {:?} {:?}", network.bssid, network.essid(), network.security.privacy());
//! }
//! # Ok::<(), netxml::NetXmlError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod models;
pub mod parser;

pub use error::{ErrorKind, NetXmlError};
pub use models::{Document, Entry, Network, Client, Record, Security};
pub use parser::{parse, parse_reader, parse_with_options, NetXmlReader, ParseOptions};
