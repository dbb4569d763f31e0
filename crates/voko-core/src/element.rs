//! The parsed element tree.
//!
//! An [`Element`] is one node of a parsed dictionary unit. Its shape follows
//! the kind's content model: text-only kinds accumulate character data,
//! mixed and element-only kinds hold an ordered [`Node`] sequence, and
//! head-bearing kinds may additionally own a `kap` head. Parents exclusively
//! own their children; there are no back-references.

use indexmap::IndexMap;

use crate::kind::{ContentModel, ElementKind};

/// One entry of an element's ordered content.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A raw text span (only inside mixed content).
    Text(String),
    /// A child element.
    Element(Element),
}

impl Node {
    /// The child element, if this entry is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// The text span, if this entry is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }
}

/// A parsed element of one dictionary unit.
///
/// Built once by the tree builder, then read-only. Attribute values are kept
/// only for attributes the grammar declares for the kind; reading an
/// undeclared attribute yields `""`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    position: u64,
    attrs: IndexMap<String, String>,
    text: String,
    content: Vec<Node>,
    head: Option<Box<Element>>,
}

impl Element {
    /// Creates an empty element of the given kind at a source byte offset.
    pub fn new(kind: ElementKind, position: u64) -> Self {
        Self {
            kind,
            position,
            attrs: IndexMap::new(),
            text: String::new(),
            content: Vec::new(),
            head: None,
        }
    }

    /// The element's kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Byte offset of the element's opening tag in the source unit.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the kind declares the named attribute.
    pub fn declares_attr(&self, name: &str) -> bool {
        self.kind.declared_attrs().iter().any(|&(n, _)| n == name)
    }

    /// Stores a declared attribute value. Undeclared attributes are ignored,
    /// mirroring the grammar's attribute lists.
    pub fn set_attr(&mut self, name: &str, value: String) {
        if self.declares_attr(name) {
            self.attrs.insert(name.to_string(), value);
        }
    }

    /// Reads an attribute: the stored value, else the declared default,
    /// else `""`.
    pub fn attr(&self, name: &str) -> &str {
        if let Some(value) = self.attrs.get(name) {
            return value;
        }
        self.kind
            .declared_attrs()
            .iter()
            .find(|&&(n, _)| n == name)
            .map(|&(_, default)| default)
            .unwrap_or("")
    }

    /// Whether the attribute was explicitly present in the markup.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Accumulated character data of a text-only element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends character data to a text-only element.
    pub fn push_text(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    /// The ordered content sequence.
    pub fn content(&self) -> &[Node] {
        &self.content
    }

    /// Appends a raw text span to mixed content.
    pub fn push_text_node(&mut self, text: String) {
        self.content.push(Node::Text(text));
    }

    /// Appends character data to mixed content, coalescing with a trailing
    /// text span so entity boundaries do not split runs of text.
    pub fn append_mixed_text(&mut self, chunk: &str) {
        if let Some(Node::Text(last)) = self.content.last_mut() {
            last.push_str(chunk);
        } else {
            self.content.push(Node::Text(chunk.to_string()));
        }
    }

    /// Appends a child element.
    pub fn push_child(&mut self, child: Element) {
        self.content.push(Node::Element(child));
    }

    /// The `kap` head of a head-bearing element.
    pub fn head(&self) -> Option<&Element> {
        self.head.as_deref()
    }

    /// Attaches the `kap` head.
    pub fn set_head(&mut self, head: Element) {
        self.head = Some(Box::new(head));
    }

    /// Child elements, skipping text spans.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(Node::as_element)
    }

    /// First child element of the given kind, in the ordinary content only.
    pub fn find_child(&self, kind: ElementKind) -> Option<&Element> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Content model of the element's kind, for convenience.
    pub fn content_model(&self) -> ContentModel {
        self.kind.content_model()
    }
}
