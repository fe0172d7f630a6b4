//! A small owned XML element tree built on `quick-xml` events.
//!
//! Release codecs walk and build [`Element`] trees instead of raw event
//! streams, so that children can be inspected in any order and description
//! markup can be dumped or re-parsed as a unit.
//!
//! Whitespace-only text is dropped while parsing unless its element also
//! holds non-blank text, so indentation disappears but the space between two
//! inline elements of a sentence stays. Elements that contain text are
//! written inline, escaping only `<`, `>` and `&`; element-only content is
//! indented by two spaces.

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser};

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    /// Byte offset of the start tag in the parsed source, 0 for built elements.
    position: u64,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Looks up an attribute by its qualified name (e.g. `xml:lang`).
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Element children only, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First element child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Appends `element` and returns a handle to it.
    pub fn add_child(&mut self, element: Element) -> &mut Element {
        self.children.push(Node::Element(element));
        match self.children.last_mut() {
            Some(Node::Element(el)) => el,
            _ => unreachable!("an element was just pushed"),
        }
    }

    /// Appends `<name>text</name>` and returns a handle to it.
    pub fn add_text_child(&mut self, name: &str, text: impl Into<String>) -> &mut Element {
        let mut element = Element::new(name);
        element.push_text(text);
        self.add_child(element)
    }

    /// All descendant text, concatenated and trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out.trim().to_string()
    }

    /// Removes whitespace-only text unless the element also holds real text.
    fn drop_blank_text(&mut self) {
        let is_blank = |node: &Node| matches!(node, Node::Text(t) if t.trim().is_empty());
        let mixed = self
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(_)) && !is_blank(n));
        if !mixed {
            self.children.retain(|n| !is_blank(n));
        }
    }

    fn has_text(&self) -> bool {
        self.children.iter().any(|n| matches!(n, Node::Text(_)))
    }

    /// Serializes the children of this element, without the element itself.
    pub fn inner_markup(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        let mut writer = Writer::new(&mut out);
        for child in &self.children {
            write_node(&mut writer, child, None)?;
        }
        String::from_utf8(out).map_err(|e| Error::DataMismatch(e.to_string()))
    }

    /// Parses a markup fragment (zero or more sibling nodes) into nodes.
    pub fn parse_fragment(markup: &str) -> Result<Vec<Node>, Error> {
        let wrapped = format!("<root>{}</root>", markup);
        let root = Element::from_bytes(wrapped.as_bytes())?;
        Ok(root.children)
    }

    /// Serializes this element as an indented document fragment.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        let mut writer = Writer::new(&mut out);
        write_element(&mut writer, self, Some(0))?;
        String::from_utf8(out).map_err(|e| Error::DataMismatch(e.to_string()))
    }
}

impl Parser for Element {
    /// Parses a document and returns its root element.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = xml_reader.buffer_position() as u64;
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => stack.push(element_from_start(e, position)?),
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e, position)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| Error::invalid_node("unbalanced end tag"))?;
                    element.drop_blank_text();
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape()?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(text.into_owned());
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::invalid_node("unexpected end of document"));
        }
        root.ok_or_else(|| Error::invalid_node("document has no root element"))
    }

    /// Writes an XML declaration followed by the indented tree.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        write_element(&mut xml_writer, self, Some(0))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn element_from_start(e: &BytesStart, position: u64) -> Result<Element, Error> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
    element.position = position;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::invalid_node("document has more than one root element"));
    }
    Ok(())
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(el, out),
        }
    }
}

fn write_node<W: Write>(
    writer: &mut Writer<W>,
    node: &Node,
    depth: Option<usize>,
) -> Result<(), Error> {
    match node {
        Node::Element(el) => write_element(writer, el, depth),
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
            Ok(())
        }
    }
}

/// `depth` is `None` when writing inline (no indentation at all).
fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    depth: Option<usize>,
) -> Result<(), Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;

    // mixed content stays inline
    let child_depth = match depth {
        Some(d) if !element.has_text() => Some(d + 1),
        _ => None,
    };
    for child in &element.children {
        if let Some(d) = child_depth {
            write_indent(writer, d)?;
        }
        write_node(writer, child, child_depth)?;
    }
    if let (Some(d), Some(_)) = (depth, child_depth) {
        write_indent(writer, d)?;
    }

    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn write_indent<W: Write>(writer: &mut Writer<W>, depth: usize) -> Result<(), Error> {
    let indent = format!("\n{}", "  ".repeat(depth));
    writer.write_event(Event::Text(BytesText::new(&indent)))?;
    Ok(())
}
