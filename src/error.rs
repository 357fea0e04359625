//! Error types for NetXML parsing
//!
//! Errors fall into two classes (see [`ErrorKind`]): format problems with the
//! input document, and fatal structural mismatches that indicate a bug in the
//! caller or in the parser itself.

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::coerce::CoerceError;

/// Broad classification of a [`NetXmlError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable or unrecognised input, or malformed float/timestamp text
    Format,
    /// A record was asked to populate itself from the wrong element
    Fatal,
}

#[derive(Debug, Error)]
pub enum NetXmlError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} does not look like a NetXML document (expected a .netxml extension)", path.display())]
    NotNetXml { path: PathBuf },

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("document contains no root element")]
    EmptyDocument,

    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),

    #[error("unexpected element <{0}> after the document root")]
    TrailingElement(String),

    #[error("unbound namespace prefix {0:?}")]
    UnboundPrefix(String),

    #[error("invalid value for {field}: {source}")]
    Coerce {
        field: String,
        #[source]
        source: CoerceError,
    },

    #[error("expected <{expected}> element, found <{found}>")]
    TagMismatch {
        expected: &'static str,
        found: String,
    },
}

impl NetXmlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetXmlError::TagMismatch { .. } => ErrorKind::Fatal,
            _ => ErrorKind::Format,
        }
    }

    pub(crate) fn coerce(field: &str, source: CoerceError) -> Self {
        NetXmlError::Coerce {
            field: field.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, NetXmlError>;
