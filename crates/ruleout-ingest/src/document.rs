//! Generic document tree built from a trial export.
//!
//! Only element names, attributes, and nesting are kept; text content,
//! comments, and processing instructions are dropped.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info_span};

use crate::error::{IngestError, Result};

/// One element: name, attributes in document order, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the first attribute named `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// All descendants in pre-order, excluding `self`.
    ///
    /// Each call returns a fresh iterator.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Descendants with the given element name, in pre-order.
    pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.descendants().filter(move |node| node.name == name)
    }
}

/// Pre-order walk over a node's subtree.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    self.stack.push(node.children.iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Parsed export: an ordered forest of top-level elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    roots: Vec<Node>,
}

impl Document {
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }
}

/// Read and parse an export file.
///
/// The file is read as bytes; its XML declaration (or byte order mark)
/// selects the character encoding.
pub fn load_document(path: &Path) -> Result<Document> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = bytes.len(), "read export file");
    parse_document_bytes(&bytes)
}

/// Parse an export held in memory as text.
pub fn parse_document(xml: &str) -> Result<Document> {
    build_tree(Reader::from_str(xml))
}

/// Parse raw export bytes, honouring the declared encoding.
pub fn parse_document_bytes(bytes: &[u8]) -> Result<Document> {
    build_tree(Reader::from_reader(bytes))
}

fn build_tree(mut reader: Reader<&[u8]>) -> Result<Document> {
    let mut stack: Vec<Node> = Vec::new();
    let mut roots = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|error| IngestError::Xml {
            position: reader.buffer_position() as u64,
            message: error.to_string(),
        })?;
        let decoder = reader.decoder();
        match event {
            Event::Start(start) => stack.push(node_from_start(&start, decoder, position)?),
            Event::Empty(start) => {
                let node = node_from_start(&start, decoder, position)?;
                attach(&mut stack, &mut roots, node);
            }
            Event::End(_) => {
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut roots, node);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(IngestError::UnclosedElement { element: open.name });
    }
    if roots.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(Document { roots })
}

fn attach(stack: &mut [Node], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn node_from_start(start: &BytesStart<'_>, decoder: Decoder, position: u64) -> Result<Node> {
    let name = decoder
        .decode(start.name().as_ref())
        .map_err(|error| IngestError::Xml {
            position,
            message: error.to_string(),
        })?
        .into_owned();
    let mut node = Node::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|error| IngestError::Attribute {
            element: node.name.clone(),
            position,
            message: error.to_string(),
        })?;
        let key = decoder
            .decode(attribute.key.as_ref())
            .map_err(|error| IngestError::Attribute {
                element: node.name.clone(),
                position,
                message: error.to_string(),
            })?
            .into_owned();
        let value = attribute
            .decode_and_unescape_value(decoder)
            .map_err(|error| IngestError::Attribute {
                element: node.name.clone(),
                position,
                message: error.to_string(),
            })?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}
