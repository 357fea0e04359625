//! Streaming NetXML reader
//!
//! Pulls namespace-resolved events from quick-xml and assembles element
//! nodes on a stack. Nothing happens when an element opens; when a
//! `card-source`, `wireless-network` or stray `wireless-client` element
//! closes, its subtree is complete and the matching record is built and
//! handed to the caller. Every other element is attached to its parent so
//! the enclosing record sees it as a child.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use log::{debug, trace, warn};
use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::coerce;
use super::node::Node;
use super::populate::Populate;
use super::tag;
use super::ParseOptions;
use crate::constants::{CARD_SOURCE_TAG, CLIENT_TAG, NETWORK_TAG, NETXML_EXTENSION, ROOT_TAG};
use crate::error::{NetXmlError, Result};
use crate::models::{CardSource, Client, Document, Entry, Network};

/// Lifecycle of a [`NetXmlReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Created, nothing read yet
    Idle,
    Parsing,
    /// Reached the end of the document
    Done,
    /// Stopped at an error; no further records are produced
    Failed,
}

/// Capture run metadata from the root element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunInfo {
    pub kismet_version: Option<String>,
    pub start_time: Option<NaiveDateTime>,
}

/// One unit of reader progress, detached from the read buffer
enum Step {
    Open(Node),
    Text(String),
    Close,
    Eof,
    Skip,
}

/// Incremental reader yielding records in document order
pub struct NetXmlReader<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    stack: Vec<Node>,
    state: ParseState,
    root_seen: bool,
    run: RunInfo,
}

impl NetXmlReader<BufReader<File>> {
    /// Open a NetXML file for reading.
    ///
    /// Fails before any parsing when the path lacks a `.netxml` extension
    /// (unless `options` allow it) or the file cannot be opened.
    pub fn from_path(path: &Path, options: &ParseOptions) -> Result<Self> {
        if options.require_extension && !has_netxml_extension(path) {
            return Err(NetXmlError::NotNetXml {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|source| NetXmlError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("opened {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> NetXmlReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = NsReader::from_reader(source);
        reader.expand_empty_elements(true);
        Self {
            reader,
            buf: Vec::new(),
            stack: Vec::new(),
            state: ParseState::Idle,
            root_seen: false,
            run: RunInfo::default(),
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Root element metadata; populated once the root element has been read.
    pub fn run_info(&self) -> &RunInfo {
        &self.run
    }

    pub fn into_run_info(self) -> RunInfo {
        self.run
    }

    fn advance(&mut self) -> Result<Option<Entry>> {
        loop {
            let step = read_step(&mut self.reader, &mut self.buf);
            self.buf.clear();
            match step? {
                Step::Open(node) => self.open(node)?,
                Step::Text(text) => {
                    if let Some(top) = self.stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Step::Close => {
                    if let Some(entry) = self.close()? {
                        return Ok(Some(entry));
                    }
                }
                Step::Eof => {
                    return match self.stack.last() {
                        Some(open) => Err(NetXmlError::UnexpectedEof(open.local_name().to_string())),
                        None if !self.root_seen => Err(NetXmlError::EmptyDocument),
                        None => Ok(None),
                    };
                }
                Step::Skip => {}
            }
        }
    }

    fn open(&mut self, node: Node) -> Result<()> {
        if self.stack.is_empty() {
            if self.root_seen {
                return Err(NetXmlError::TrailingElement(node.local_name().to_string()));
            }
            self.begin_document(&node)?;
        }
        self.stack.push(node);
        Ok(())
    }

    fn begin_document(&mut self, root: &Node) -> Result<()> {
        self.root_seen = true;
        if root.local_name() != ROOT_TAG {
            warn!(
                "root element is <{}>, expected <{}>; parsing anyway",
                root.local_name(),
                ROOT_TAG
            );
        }
        self.run.kismet_version = coerce::to_string(root.attribute("kismet-version"));
        self.run.start_time = match coerce::to_timestamp(root.attribute("start-time")) {
            Ok(start_time) => start_time,
            Err(e) => {
                warn!("ignoring run start time: {}", e);
                None
            }
        };
        debug!("reading capture from kismet {:?}", self.run.kismet_version);
        Ok(())
    }

    fn close(&mut self) -> Result<Option<Entry>> {
        let Some(node) = self.stack.pop() else {
            return Ok(None);
        };

        match node.local_name() {
            // Kismet repeats <card-source> inside itself for the source name
            CARD_SOURCE_TAG if !self.parent_is(CARD_SOURCE_TAG) => {
                let card = CardSource::from_node(&node)?;
                debug!("card source {:?}", card.card_name);
                return Ok(Some(Entry::CardSource(card)));
            }
            NETWORK_TAG => {
                let network = Network::from_node(&node)?;
                debug!(
                    "network {:?} ({:?}) with {} clients",
                    network.number,
                    network.bssid,
                    network.clients.len()
                );
                return Ok(Some(Entry::Network(network)));
            }
            CLIENT_TAG if !self.parent_is(NETWORK_TAG) => {
                let client = Client::with_parent(&node, None)?;
                warn!("client {:?} is not inside a network", client.client_mac);
                return Ok(Some(Entry::Client(client)));
            }
            _ => {}
        }

        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => trace!("closed root element <{}>", node.local_name()),
        }
        Ok(None)
    }

    fn parent_is(&self, tag: &str) -> bool {
        self.stack
            .last()
            .is_some_and(|parent| parent.local_name() == tag)
    }
}

impl<R: BufRead> Iterator for NetXmlReader<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            ParseState::Done | ParseState::Failed => return None,
            ParseState::Idle => self.state = ParseState::Parsing,
            ParseState::Parsing => {}
        }
        match self.advance() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.state = ParseState::Done;
                None
            }
            Err(err) => {
                self.state = ParseState::Failed;
                Some(Err(err))
            }
        }
    }
}

fn has_netxml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(NETXML_EXTENSION))
}

/// Empty elements arrive expanded as Start/End pairs. Text, names and
/// values are decoded with the encoding the XML declaration names.
fn read_step<R: BufRead>(reader: &mut NsReader<R>, buf: &mut Vec<u8>) -> Result<Step> {
    let decoder = reader.decoder();
    let step = match reader.read_resolved_event_into(buf)? {
        (ns, Event::Start(start)) => Step::Open(element(decoder, ns, &start)?),
        (_, Event::End(_)) => Step::Close,
        (_, Event::Text(text)) => Step::Text(text.unescape()?.into_owned()),
        (_, Event::CData(data)) => Step::Text(decoder.decode(&data)?.into_owned()),
        (_, Event::Eof) => Step::Eof,
        _ => Step::Skip,
    };
    Ok(step)
}

fn element(decoder: Decoder, ns: ResolveResult, start: &BytesStart) -> Result<Node> {
    let local_name = start.local_name();
    let local = decoder.decode(local_name.as_ref())?;
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(decoder.decode(uri)?),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(NetXmlError::UnboundPrefix(
                String::from_utf8_lossy(&prefix).into_owned(),
            ))
        }
    };

    let mut node = Node::new(tag::qualify(namespace.as_deref(), &local));
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            trace!("namespace declaration on <{}>", local);
            continue;
        }
        let key = decoder.decode(attr.key.local_name().as_ref())?.into_owned();
        let value = unescape(&decoder.decode(&attr.value)?)
            .map_err(quick_xml::Error::from)?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

/// Read a whole document from any buffered source.
pub fn parse_reader<R: BufRead>(source: R) -> Result<Document> {
    collect(NetXmlReader::new(source))
}

/// Parse a NetXML file with default options.
pub fn parse(path: impl AsRef<Path>) -> Result<Document> {
    parse_with_options(path, &ParseOptions::default())
}

pub fn parse_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let mut document = collect(NetXmlReader::from_path(path, options)?)?;
    document.name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(document)
}

fn collect<R: BufRead>(mut reader: NetXmlReader<R>) -> Result<Document> {
    let mut document = Document::new();
    for entry in reader.by_ref() {
        document.insert(entry?);
    }
    let run = reader.into_run_info();
    document.kismet_version = run.kismet_version;
    document.start_time = run.start_time;
    Ok(document)
}
