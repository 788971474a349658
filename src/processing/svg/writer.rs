//! Serializes a [`Document`] back to text.

use std::io::{self, Write as _};

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute as XmlAttribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use super::ast::{Document, Element, Node};
use crate::utils::{OptimizerError, OptimizerResult};

/// Output formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Put every element on its own line, indented by nesting depth
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { pretty: false, indent: 2 }
    }
}

impl WriteOptions {
    pub fn pretty(pretty: bool) -> Self {
        Self { pretty, ..Self::default() }
    }
}

/// Writes `doc` as SVG text.
///
/// Elements without children self-close. Elements holding character data keep
/// their content on one line even in pretty mode, so no whitespace is added to
/// text.
pub fn write_document(doc: &Document, options: WriteOptions) -> OptimizerResult<String> {
    let mut writer = if options.pretty {
        Writer::new_with_indent(Vec::new(), b' ', options.indent)
    } else {
        Writer::new(Vec::new())
    };

    for node in &doc.children {
        write_node(&mut writer, node, options.pretty)?;
    }

    let mut out = writer.into_inner();
    if options.pretty && !out.is_empty() {
        out.push(b'\n');
    }
    String::from_utf8(out)
        .map_err(|e| OptimizerError::pipeline(format!("Serialized SVG is not valid UTF-8: {e}")))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node, pretty: bool) -> io::Result<()> {
    match node {
        Node::Element(el) if pretty && holds_character_data(el) => write_inline(writer, el),
        Node::Element(el) => write_element(writer, el, pretty),
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))))
        }
        Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text.as_str()))),
        Node::Comment(text) => writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str()))),
        Node::Instruction { target, content } => {
            let body = if content.is_empty() { target.clone() } else { format!("{target} {content}") };
            writer.write_event(Event::PI(BytesPI::new(body)))
        }
        Node::Declaration(text) => {
            let start = BytesStart::from_content(format!("xml {text}"), 3);
            writer.write_event(Event::Decl(BytesDecl::from_start(start)))
        }
        Node::Doctype(text) => writer.write_event(Event::DocType(BytesText::from_escaped(text.as_str()))),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element, pretty: bool) -> io::Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for attr in &el.attributes {
        let value = escape_attribute(&attr.value);
        start.push_attribute(XmlAttribute::from((attr.name.as_bytes(), value.as_bytes())));
    }

    if el.children.is_empty() {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        write_node(writer, child, pretty)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))
}

/// Writes `el` compactly on its own line of an indenting writer.
fn write_inline(writer: &mut Writer<Vec<u8>>, el: &Element) -> io::Result<()> {
    let mut inline = Writer::new(Vec::new());
    write_element(&mut inline, el, false)?;

    if !writer.get_ref().is_empty() {
        writer.write_indent()?;
    }
    writer.get_mut().write_all(inline.get_ref())?;
    // Eof writes nothing but puts the next event on a new line.
    writer.write_event(Event::Eof)
}

fn holds_character_data(el: &Element) -> bool {
    el.children.iter().any(|c| matches!(c, Node::Text(_) | Node::CData(_)))
}

/// Attribute values are always written in double quotes.
fn escape_attribute(value: &str) -> String {
    partial_escape(value).replace('"', "&quot;")
}
