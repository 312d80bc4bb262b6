//! Lossless element tree over an MSBuild project file
//!
//! The tree keeps every event quick-xml produces (whitespace text, comments,
//! declarations, raw attribute bytes), so serializing an unmodified document
//! reproduces the input exactly. Only the elements a mutation touches change.

use crate::core::{ConvertError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

const BOM: &str = "\u{feff}";

/// Indentation added per nesting level when a container has no children to copy from.
const INDENT_UNIT: &str = "  ";

#[derive(Clone, Debug)]
pub enum XmlNode {
    Element(XmlElement),
    Text(BytesText<'static>),
    /// Comments, CDATA, declarations, processing instructions, doctype
    Other(Event<'static>),
}

#[derive(Clone, Debug)]
pub struct XmlElement {
    start: BytesStart<'static>,
    end: Option<BytesEnd<'static>>,
    children: Vec<XmlNode>,
    self_closing: bool,
}

impl XmlElement {
    fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_string()),
            end: None,
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.start.name().into_inner())
    }

    fn is_named(&self, name: &str) -> bool {
        self.start.name().as_ref() == name.as_bytes()
    }

    /// Concatenated text of all descendant text and CDATA nodes, unescaped.
    pub fn text(&self) -> Result<String> {
        let mut out = String::new();
        collect_text(&self.children, &mut out)?;
        Ok(out)
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, value: &str) {
        self.open();
        self.children.clear();
        if !value.is_empty() {
            self.children
                .push(XmlNode::Text(BytesText::new(value).into_owned()));
        }
    }

    /// Append `child` after the last element child, reusing that child's
    /// leading whitespace so the new line lines up with its siblings.
    fn append_indented(&mut self, child: XmlElement, own_indent: Option<&str>) {
        self.open();

        let last_element = self
            .children
            .iter()
            .rposition(|node| matches!(node, XmlNode::Element(_)));

        match last_element {
            Some(index) => {
                let indent = index
                    .checked_sub(1)
                    .and_then(|prev| whitespace(&self.children[prev]))
                    .map(str::to_string);
                let mut insert = Vec::with_capacity(2);
                if let Some(indent) = indent {
                    insert.push(text_node(indent));
                }
                insert.push(XmlNode::Element(child));
                let at = index + 1;
                self.children.splice(at..at, insert);
            }
            None => {
                let closing_indent = own_indent.unwrap_or("").to_string();
                let child_indent = own_indent.map(|indent| format!("{indent}{INDENT_UNIT}"));
                let trailing = self
                    .children
                    .iter()
                    .all(|node| whitespace(node).is_some())
                    .then(|| std::mem::take(&mut self.children));

                if let Some(indent) = child_indent {
                    self.children.push(text_node(indent));
                }
                self.children.push(XmlNode::Element(child));
                match trailing {
                    Some(existing) if !existing.is_empty() => self.children.extend(existing),
                    _ if own_indent.is_some() => self.children.push(text_node(closing_indent)),
                    _ => {}
                }
            }
        }
    }

    /// Turn `<Name />` into `<Name></Name>` so children can be added.
    fn open(&mut self) {
        if !self.self_closing {
            return;
        }
        self.self_closing = false;
        let name_len = self.start.name().as_ref().len();
        let content = String::from_utf8_lossy(&self.start).trim_end().to_string();
        self.start = BytesStart::from_content(content, name_len);
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> std::io::Result<()> {
        if self.self_closing && self.children.is_empty() {
            return write_event(writer, Event::Empty(self.start.clone()));
        }
        write_event(writer, Event::Start(self.start.clone()))?;
        write_nodes(&self.children, writer)?;
        match &self.end {
            Some(end) => write_event(writer, Event::End(end.clone())),
            None => write_event(writer, Event::End(self.start.to_end())),
        }
    }
}

/// Parsed project file. Serializing an unmodified document yields the original bytes.
#[derive(Clone, Debug)]
pub struct ProjectDocument {
    nodes: Vec<XmlNode>,
    has_bom: bool,
    path: PathBuf,
}

impl ProjectDocument {
    /// Parse `text`; `path` is used only in error messages.
    pub fn parse(text: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (has_bom, body) = match text.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let mut reader = Reader::from_str(body);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut nodes = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                ConvertError::malformed(
                    format!("{e} at byte {}", reader.buffer_position()),
                    &path,
                )
            })?;
            let node = match event {
                Event::Eof => break,
                Event::Start(start) => {
                    stack.push(XmlElement {
                        start: start.into_owned(),
                        end: None,
                        children: Vec::new(),
                        self_closing: false,
                    });
                    continue;
                }
                Event::End(end) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        ConvertError::malformed("unexpected closing tag", &path)
                    })?;
                    element.end = Some(end.into_owned());
                    XmlNode::Element(element)
                }
                Event::Empty(start) => XmlNode::Element(XmlElement {
                    start: start.into_owned(),
                    end: None,
                    children: Vec::new(),
                    self_closing: true,
                }),
                Event::Text(text) => XmlNode::Text(text.into_owned()),
                other => XmlNode::Other(other.into_owned()),
            };
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => nodes.push(node),
            }
        }

        if let Some(open) = stack.last() {
            return Err(ConvertError::malformed(
                format!("<{}> is never closed", open.name()),
                &path,
            ));
        }
        if !nodes.iter().any(|node| matches!(node, XmlNode::Element(_))) {
            return Err(ConvertError::malformed("no root element", &path));
        }

        Ok(Self {
            nodes,
            has_bom,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of elements named `name` anywhere in the document.
    pub fn count_elements(&self, name: &str) -> usize {
        count_named(&self.nodes, name)
    }

    /// First element named `name` in document order.
    pub fn first_element(&self, name: &str) -> Option<&XmlElement> {
        first_named(&self.nodes, name)
    }

    pub fn first_element_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        first_named_mut(&mut self.nodes, name)
    }

    /// Append `<name>value</name>` to the first element named `container`.
    /// Returns false when no such container exists.
    pub fn append_child_element(&mut self, container: &str, name: &str, value: &str) -> bool {
        let own_indent = indent_of_first(&self.nodes, container);
        let Some(parent) = first_named_mut(&mut self.nodes, container) else {
            return false;
        };
        let mut child = XmlElement::new(name);
        child.set_text(value);
        parent.append_indented(child, own_indent.as_deref());
        true
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        write_nodes(&self.nodes, &mut writer)
            .map_err(|e| ConvertError::io("Failed to serialize project file", &self.path, e))?;
        let body = String::from_utf8(writer.into_inner())
            .map_err(|e| ConvertError::malformed(e.to_string(), &self.path))?;
        Ok(if self.has_bom {
            format!("{BOM}{body}")
        } else {
            body
        })
    }
}

fn text_node(text: String) -> XmlNode {
    XmlNode::Text(BytesText::from_escaped(text))
}

/// The node's content if it is a whitespace-only text node.
fn whitespace(node: &XmlNode) -> Option<&str> {
    match node {
        XmlNode::Text(text) => std::str::from_utf8(text)
            .ok()
            .filter(|s| s.chars().all(char::is_whitespace)),
        _ => None,
    }
}

fn collect_text(nodes: &[XmlNode], out: &mut String) -> Result<()> {
    for node in nodes {
        match node {
            XmlNode::Text(text) => {
                let unescaped = text
                    .unescape()
                    .map_err(|e| ConvertError::malformed(e.to_string(), PathBuf::new()))?;
                out.push_str(&unescaped);
            }
            XmlNode::Other(Event::CData(cdata)) => {
                out.push_str(&String::from_utf8_lossy(cdata));
            }
            XmlNode::Element(element) => collect_text(&element.children, out)?,
            XmlNode::Other(_) => {}
        }
    }
    Ok(())
}

fn count_named(nodes: &[XmlNode], name: &str) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            XmlNode::Element(element) => {
                usize::from(element.is_named(name)) + count_named(&element.children, name)
            }
            _ => 0,
        })
        .sum()
}

fn first_named<'a>(nodes: &'a [XmlNode], name: &str) -> Option<&'a XmlElement> {
    nodes.iter().find_map(|node| match node {
        XmlNode::Element(element) if element.is_named(name) => Some(element),
        XmlNode::Element(element) => first_named(&element.children, name),
        _ => None,
    })
}

fn first_named_mut<'a>(nodes: &'a mut [XmlNode], name: &str) -> Option<&'a mut XmlElement> {
    for node in nodes.iter_mut() {
        if let XmlNode::Element(element) = node {
            if element.is_named(name) {
                return Some(element);
            }
            if let Some(found) = first_named_mut(&mut element.children, name) {
                return Some(found);
            }
        }
    }
    None
}

/// Whitespace after the last line break preceding the first element named `name`.
fn indent_of_first(nodes: &[XmlNode], name: &str) -> Option<String> {
    for (index, node) in nodes.iter().enumerate() {
        let XmlNode::Element(element) = node else {
            continue;
        };
        if element.is_named(name) {
            return index
                .checked_sub(1)
                .and_then(|prev| whitespace(&nodes[prev]))
                .map(|ws| ws.rsplit(['\n', '\r']).next().unwrap_or(ws).to_string())
                .map(|indent| format!("{}{indent}", line_break_of(nodes)));
        }
        if first_named(&element.children, name).is_some() {
            return indent_of_first(&element.children, name);
        }
    }
    None
}

/// Line break style used by the surrounding whitespace, `\n` by default.
fn line_break_of(nodes: &[XmlNode]) -> &'static str {
    let crlf = nodes
        .iter()
        .filter_map(whitespace)
        .any(|ws| ws.contains("\r\n"));
    if crlf {
        "\r\n"
    } else {
        "\n"
    }
}

fn write_nodes<W: std::io::Write>(
    nodes: &[XmlNode],
    writer: &mut Writer<W>,
) -> std::io::Result<()> {
    for node in nodes {
        match node {
            XmlNode::Element(element) => element.write(writer)?,
            XmlNode::Text(text) => write_event(writer, Event::Text(text.clone()))?,
            XmlNode::Other(event) => write_event(writer, event.clone())?,
        }
    }
    Ok(())
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> std::io::Result<()> {
    writer.write_event(event).map_err(std::io::Error::other)
}
