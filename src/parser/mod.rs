//! NetXML document parsing
//!
//! - tag: namespace splitting and field-name normalisation
//! - coerce: null-preserving text conversions
//! - node: element tree handed to record population
//! - populate: per-record field tables and nested record construction
//! - encryption: privacy/cipher/authentication inference
//! - reader: streaming driver and `parse` entry points

pub mod coerce;
pub mod encryption;
pub mod node;
pub mod populate;
pub mod reader;
pub mod tag;

pub use node::Node;
pub use populate::{FieldTable, Populate};
pub use reader::{parse, parse_reader, parse_with_options, NetXmlReader, ParseState, RunInfo};

/// Options controlling how a document is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject paths without a `.netxml` extension
    pub require_extension: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_extension: true,
        }
    }
}
