//! Builds a [`Document`] from SVG text with quick-xml events.

use std::str;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesStart, Event};

use super::ast::{Attribute, Document, Element, Node};
use crate::utils::{OptimizerError, OptimizerResult};

/// Elements whose whitespace-only text is content rather than formatting.
const TEXT_CONTENT: &[&str] = &["text", "tspan", "textPath", "style", "title", "desc"];

/// Parses `text` into an owned document.
///
/// Fails on malformed XML (unbalanced tags, broken attributes) and on documents
/// without any element.
pub fn parse_document(text: &str) -> OptimizerResult<Document> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut doc = Document::default();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            OptimizerError::pipeline(format!(
                "Error in parsing SVG at position {}: {}",
                reader.error_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                attach(&mut doc, &mut stack, Node::Element(element));
            }
            Event::End(e) => {
                let element = stack.pop().ok_or_else(|| {
                    OptimizerError::pipeline(format!(
                        "Unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                attach(&mut doc, &mut stack, Node::Element(element));
            }
            Event::Text(e) => {
                let text = utf8(&e)?;
                push_text(&mut stack, text);
            }
            Event::GeneralRef(e) => {
                let entity = format!("&{};", utf8(&e)?);
                // Entities we cannot resolve stay as written.
                let resolved = match unescape(&entity) {
                    Ok(value) => value.into_owned(),
                    Err(_) => entity.clone(),
                };
                push_text(&mut stack, &resolved);
            }
            Event::CData(e) => {
                let text = utf8(&e)?.to_string();
                attach(&mut doc, &mut stack, Node::CData(text));
            }
            Event::Comment(e) => {
                let text = utf8(&e)?.to_string();
                attach(&mut doc, &mut stack, Node::Comment(text));
            }
            Event::Decl(e) => {
                attach(&mut doc, &mut stack, Node::Declaration(declaration_text(&e)));
            }
            Event::PI(e) => {
                let target = utf8(e.target())?.to_string();
                let content = utf8(e.content())?.trim().to_string();
                attach(&mut doc, &mut stack, Node::Instruction { target, content });
            }
            Event::DocType(e) => {
                let text = utf8(&e)?.trim().to_string();
                attach(&mut doc, &mut stack, Node::Doctype(text));
            }
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(OptimizerError::pipeline(format!("Unclosed element <{}>", open.name)));
    }

    if doc.root().is_none() {
        return Err(OptimizerError::pipeline("No root element found"));
    }

    Ok(doc)
}

fn utf8(bytes: &[u8]) -> OptimizerResult<&str> {
    str::from_utf8(bytes)
        .map_err(|e| OptimizerError::pipeline(format!("Invalid UTF-8 in SVG: {e}")))
}

fn start_element(e: &BytesStart) -> OptimizerResult<Element> {
    let mut element = Element::new(utf8(e.name().as_ref())?);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| OptimizerError::pipeline(format!(
            "Invalid attribute on <{}>: {}", element.name, err
        )))?;
        let name = utf8(attr.key.as_ref())?.to_string();
        let raw = utf8(&attr.value)?;
        let value = match unescape(raw) {
            Ok(value) => value.into_owned(),
            Err(_) => raw.to_string(),
        };
        element.attributes.push(Attribute { name, value });
    }

    Ok(element)
}

fn declaration_text(decl: &BytesDecl) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Ok(version) = decl.version() {
        parts.push(format!("version=\"{}\"", String::from_utf8_lossy(&version)));
    }
    if let Some(Ok(encoding)) = decl.encoding() {
        parts.push(format!("encoding=\"{}\"", String::from_utf8_lossy(&encoding)));
    }
    if let Some(Ok(standalone)) = decl.standalone() {
        parts.push(format!("standalone=\"{}\"", String::from_utf8_lossy(&standalone)));
    }
    parts.join(" ")
}

/// Appends `node` to the innermost open element, or to the document.
fn attach(doc: &mut Document, stack: &mut [Element], node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => doc.children.push(node),
    }
}

/// Adds character data, merging with a preceding text node.
///
/// Whitespace-only runs are formatting unless they continue existing text or
/// sit inside a text-content element.
fn push_text(stack: &mut [Element], text: &str) {
    // Character data outside the root element carries no meaning.
    let Some(parent) = stack.last_mut() else {
        return;
    };

    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
        return;
    }

    let whitespace_only = text.chars().all(|c| c.is_ascii_whitespace());
    if whitespace_only && !TEXT_CONTENT.contains(&parent.name.as_str()) {
        return;
    }

    parent.children.push(Node::Text(text.to_string()));
}
