//! Minimal element tree for loading rendered outlines back.
//!
//! Only what the navigation index needs is kept: element names,
//! attributes, own text, parent/child links and a hidden flag. Elements
//! live in an arena in document (pre-)order, so arena order is document
//! order.

use std::collections::HashMap;

use quick_xml::{Reader, events::BytesStart, events::Event};

use crate::error::{Error, Result};

/// Index of an element inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Synthetic root holding all top-level elements.
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    hidden: bool,
}

impl Element {
    fn new(name: String, attrs: Vec<(String, String)>, parent: Option<NodeId>) -> Self {
        Self {
            name,
            attrs,
            parent,
            children: Vec::new(),
            text: String::new(),
            hidden: false,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }

    /// Text directly inside this element, child elements excluded.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_checked(&self) -> bool {
        self.attr("checked").is_some()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_attr(&mut self, name: &str, value: Option<&str>) {
        let pos = self.attrs.iter().position(|(k, _)| k == name);
        match (pos, value) {
            (Some(i), Some(v)) => self.attrs[i].1 = v.to_string(),
            (None, Some(v)) => self.attrs.push((name.to_string(), v.to_string())),
            (Some(i), None) => {
                self.attrs.remove(i);
            }
            (None, None) => {}
        }
    }
}

/// A parsed XML-compatible document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    ids: HashMap<String, NodeId>,
}

fn doc_err(e: impl std::fmt::Display) -> Error {
    Error::Document(e.to_string())
}

impl Document {
    /// Parses rendered markup, either a full page or a bare outline.
    pub fn parse(markup: &str) -> Result<Self> {
        let mut doc = Document {
            nodes: vec![Element::new("#document".into(), Vec::new(), None)],
            ids: HashMap::new(),
        };
        let mut reader = Reader::from_str(markup);
        let mut open = vec![NodeId::ROOT];

        loop {
            let current = *open.last().unwrap_or(&NodeId::ROOT);
            match reader.read_event()? {
                Event::Start(start) => {
                    let id = doc.push(current, &start)?;
                    open.push(id);
                }
                Event::Empty(start) => {
                    doc.push(current, &start)?;
                }
                Event::End(_) => {
                    if open.len() == 1 {
                        return Err(Error::Document(format!(
                            "unexpected closing tag at byte {}",
                            reader.buffer_position()
                        )));
                    }
                    open.pop();
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(doc_err)?;
                    doc.nodes[current.0].text.push_str(&text);
                }
                Event::Eof => break,
                // Doctype, comments and the CDATA-wrapped script.
                _ => {}
            }
        }

        if open.len() > 1 {
            let name = &doc.nodes[open[open.len() - 1].0].name;
            return Err(Error::Document(format!("element <{name}> is never closed")));
        }
        trace!("loaded document with {} elements", doc.nodes.len() - 1);
        Ok(doc)
    }

    fn push(&mut self, parent: NodeId, start: &BytesStart<'_>) -> Result<NodeId> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(doc_err)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(doc_err)?.into_owned();
            attrs.push((key, value));
        }

        let id = NodeId(self.nodes.len());
        let element = Element::new(name, attrs, Some(parent));
        if let Some(anchor) = element.attr("id") {
            self.ids.entry(anchor.to_string()).or_insert(id);
        }
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    /// Element carrying `id="anchor"`; the first one wins.
    pub fn element_by_id(&self, anchor: &str) -> Option<NodeId> {
        self.ids.get(anchor).copied()
    }

    /// All elements, root excluded, in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..self.nodes.len()).map(NodeId)
    }

    /// `name` elements carrying `class`, in document order.
    pub fn select(&self, name: &str, class: &str) -> Vec<NodeId> {
        self.elements()
            .filter(|&id| {
                let el = self.get(id);
                el.name == name && el.has_class(class)
            })
            .collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// Siblings before `id`, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings = self
            .parent(id)
            .map(|p| self.get(p).children.as_slice())
            .unwrap_or_default();
        let pos = siblings.iter().position(|&s| s == id).unwrap_or(0);
        siblings[..pos].iter().rev().copied()
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        let value = checked.then_some("checked");
        self.nodes[id.0].set_attr("checked", value);
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        self.nodes[id.0].hidden = hidden;
    }
}
