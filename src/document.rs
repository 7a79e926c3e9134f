//! Queryable structured documents.
//!
//! Extractors never touch a concrete parser. They work against the
//! [`StructuredDocument`] capability: "give me the first / every node matching
//! this selector", plus per-node attribute and text lookups. Two backends
//! implement it:
//!
//! - [`MarkupDocument`]: HTML parsed with `scraper` (html5ever). Selectors are
//!   CSS selectors. html5ever never fails; broken markup yields a repaired tree.
//! - [`DataDocument`]: XML parsed with `quick-xml`. Selectors are plain tag
//!   names (`*` matches any element). Malformed input stops parsing at the
//!   first error and keeps whatever was read so far.
//!
//! An unparsable CSS selector matches nothing and logs a warning.

use log::warn;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;

/// Read-only query interface shared by every document kind.
pub trait StructuredDocument {
    /// First node matching `selector` in document order.
    fn query(&self, selector: &str) -> Option<Node<'_>> {
        self.query_all(selector).into_iter().next()
    }

    /// Every node matching `selector` in document order.
    fn query_all(&self, selector: &str) -> Vec<Node<'_>>;
}

/// A parsed document of either kind.
#[derive(Debug)]
pub enum Document {
    Markup(MarkupDocument),
    Data(DataDocument),
}

impl StructuredDocument for Document {
    fn query_all(&self, selector: &str) -> Vec<Node<'_>> {
        match self {
            Document::Markup(doc) => doc.query_all(selector),
            Document::Data(doc) => doc.query_all(selector),
        }
    }
}

/// An element inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Markup(ElementRef<'a>),
    Data { doc: &'a DataDocument, index: usize },
}

impl<'a> Node<'a> {
    /// Tag name.
    pub fn name(&self) -> &'a str {
        match *self {
            Node::Markup(el) => el.value().name(),
            Node::Data { doc, index } => &doc.elements[index].name,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        match *self {
            Node::Markup(el) => el.value().attr(name),
            Node::Data { doc, index } => doc.elements[index]
                .attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
        }
    }

    /// Concatenated text of this node and all its descendants, untrimmed.
    pub fn text(&self) -> String {
        match *self {
            Node::Markup(el) => el.text().collect(),
            Node::Data { doc, index } => doc.subtree(index).map(|el| el.text.as_str()).collect(),
        }
    }

    /// First descendant matching `selector`.
    pub fn query(&self, selector: &str) -> Option<Node<'a>> {
        self.query_all(selector).into_iter().next()
    }

    /// Every descendant matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<Node<'a>> {
        match *self {
            Node::Markup(el) => match compile(selector) {
                Some(sel) => el.select(&sel).map(Node::Markup).collect(),
                None => Vec::new(),
            },
            Node::Data { doc, index } => doc.matching(selector, index + 1..doc.elements[index].end),
        }
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(err) => {
            warn!("ignoring unparsable selector {selector:?}: {err:?}");
            None
        }
    }
}

// ============================================================================
// Markup (HTML)
// ============================================================================

/// HTML document backed by `scraper`.
#[derive(Debug)]
pub struct MarkupDocument {
    html: Html,
}

impl MarkupDocument {
    pub fn parse(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
        }
    }
}

impl StructuredDocument for MarkupDocument {
    fn query_all(&self, selector: &str) -> Vec<Node<'_>> {
        match compile(selector) {
            Some(sel) => self.html.select(&sel).map(Node::Markup).collect(),
            None => Vec::new(),
        }
    }
}

// ============================================================================
// Data interchange (XML)
// ============================================================================

/// XML document flattened into document order.
///
/// Each element records the index one past its last descendant, so the
/// subtree of element `i` is the contiguous range `i..end`.
#[derive(Debug, Default)]
pub struct DataDocument {
    elements: Vec<DataElement>,
}

#[derive(Debug)]
struct DataElement {
    name: String,
    attrs: Vec<(String, String)>,
    /// Text directly inside this element (not its children).
    text: String,
    end: usize,
}

impl DataDocument {
    pub fn parse(content: &str) -> Self {
        let mut reader = Reader::from_str(content);
        let mut elements: Vec<DataElement> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    elements.push(DataElement::from_start(&start));
                    open.push(elements.len() - 1);
                }
                Ok(Event::Empty(start)) => {
                    elements.push(DataElement::from_start(&start));
                    let idx = elements.len() - 1;
                    elements[idx].end = idx + 1;
                }
                Ok(Event::End(_)) => {
                    if let Some(idx) = open.pop() {
                        elements[idx].end = elements.len();
                    }
                }
                Ok(Event::Text(text)) => {
                    if let Some(&idx) = open.last() {
                        let unescaped = text
                            .unescape()
                            .map(Cow::into_owned)
                            .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                        elements[idx].text.push_str(&unescaped);
                    }
                }
                Ok(Event::CData(data)) => {
                    if let Some(&idx) = open.last() {
                        elements[idx].text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Ok(Event::Eof) => break,
                Err(err) => {
                    warn!(
                        "XML parse stopped at byte {}: {err}",
                        reader.buffer_position()
                    );
                    break;
                }
                _ => {}
            }
        }

        // Unterminated elements extend to the end of what was read.
        let len = elements.len();
        for idx in open {
            elements[idx].end = len;
        }

        Self { elements }
    }

    fn subtree(&self, index: usize) -> impl Iterator<Item = &DataElement> {
        self.elements[index..self.elements[index].end].iter()
    }

    fn matching(&self, selector: &str, range: std::ops::Range<usize>) -> Vec<Node<'_>> {
        let selector = selector.trim();
        range
            .filter(|&idx| selector == "*" || self.elements[idx].name == selector)
            .map(|index| Node::Data { doc: self, index })
            .collect()
    }
}

impl DataElement {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let attrs = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                (key, value)
            })
            .collect();
        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            text: String::new(),
            end: 0,
        }
    }
}

impl StructuredDocument for DataDocument {
    fn query_all(&self, selector: &str) -> Vec<Node<'_>> {
        self.matching(selector, 0..self.elements.len())
    }
}
