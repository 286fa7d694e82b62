//! Event-driven XML parsing into the arena.

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::document::{Document, NodeId, NodeRecord};

/// Parse failure: the input is not a well-formed, single-rooted document.
#[derive(Debug, Error)]
pub enum DomError {
    /// The XML reader rejected the input.
    #[error("malformed document: {0}")]
    Malformed(String),
    /// The input scanned but does not form a single-rooted element tree.
    #[error("malformed document: {0}")]
    Structure(&'static str),
}

fn malformed(err: impl std::fmt::Display) -> DomError {
    DomError::Malformed(err.to_string())
}

impl Document {
    /// Parse a serialized document.
    pub fn parse(bytes: &[u8]) -> Result<Document, DomError> {
        let mut reader = Reader::from_reader(bytes);
        let mut builder = TreeBuilder::default();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).map_err(malformed)? {
                Event::Start(start) => {
                    let (name, attributes) = decode_start(&start)?;
                    let id = builder.open(name, attributes)?;
                    builder.stack.push(id);
                }
                Event::Empty(start) => {
                    let (name, attributes) = decode_start(&start)?;
                    builder.open(name, attributes)?;
                }
                Event::End(_) => builder.close(),
                Event::Text(text) => {
                    let chunk = text.unescape().map_err(malformed)?;
                    builder.text(&chunk)?;
                }
                Event::CData(cdata) => {
                    let chunk = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    builder.text(&chunk)?;
                }
                Event::Eof => break,
                // declarations, comments, processing instructions, doctypes
                _ => {}
            }
            buf.clear();
        }
        if !builder.stack.is_empty() {
            return Err(DomError::Structure("unclosed element at end of input"));
        }
        let root = builder
            .root
            .ok_or(DomError::Structure("document has no root element"))?;
        Ok(Document {
            nodes: builder.nodes,
            root,
        })
    }

    pub fn parse_str(text: &str) -> Result<Document, DomError> {
        Document::parse(text.as_bytes())
    }
}

fn decode_start(start: &BytesStart) -> Result<(String, IndexMap<String, String>), DomError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = IndexMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(malformed)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(malformed)?.into_owned();
        attributes.insert(key, value);
    }
    Ok((name, attributes))
}

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<NodeRecord>,
    stack: Vec<NodeId>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    fn open(
        &mut self,
        name: String,
        attributes: IndexMap<String, String>,
    ) -> Result<NodeId, DomError> {
        let parent = self.stack.last().copied();
        if parent.is_none() && self.root.is_some() {
            return Err(DomError::Structure("multiple root elements"));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            name,
            attributes,
            text: None,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.root = Some(id),
        }
        Ok(id)
    }

    fn text(&mut self, chunk: &str) -> Result<(), DomError> {
        match self.stack.last() {
            Some(&top) => {
                let record = &mut self.nodes[top.index()];
                match &mut record.text {
                    Some(text) => text.push_str(chunk),
                    None => record.text = Some(chunk.to_owned()),
                }
                Ok(())
            }
            // whitespace around the root element is not content
            None if chunk.trim().is_empty() => Ok(()),
            None => Err(DomError::Structure(
                "character data outside the root element",
            )),
        }
    }

    fn close(&mut self) {
        if let Some(id) = self.stack.pop() {
            let record = &mut self.nodes[id.index()];
            let only_whitespace = record
                .text
                .as_deref()
                .is_some_and(|text| text.trim().is_empty());
            if only_whitespace && !record.children.is_empty() {
                record.text = None;
            }
        }
    }
}
