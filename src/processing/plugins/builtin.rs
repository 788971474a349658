//! The built-in plugin set.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use svgtypes::{Length, LengthUnit, NumberListParser, TransformListParser, TransformListToken};

use super::{PluginParams, PluginRegistry};
use crate::processing::svg::{Document, Element, Node, Visitor};
use crate::utils::{OptimizerResult, format_number, parse_leading_number, round_to};

pub(super) fn register_all(registry: &mut PluginRegistry) {
    registry.register("removeDoctype", |_| Box::new(RemoveDoctype));
    registry.register("removeXMLProcInst", |_| Box::new(RemoveXmlProcInst));
    registry.register("removeComments", |_| Box::new(RemoveComments));
    registry.register("removeMetadata", |_| Box::new(RemoveElements(&["metadata"])));
    registry.register("removeTitle", |_| Box::new(RemoveElements(&["title"])));
    registry.register("removeDesc", |_| Box::new(RemoveDesc));
    registry.register("removeEditorsNSData", |_| Box::new(RemoveEditorsNsData::default()));
    registry.register("cleanupAttrs", |_| Box::new(CleanupAttrs));
    registry.register("removeEmptyAttrs", |_| Box::new(RemoveEmptyAttrs));
    registry.register("removeEmptyContainers", |_| Box::new(RemoveEmptyContainers));
    registry.register("cleanupNumericValues", |p| Box::new(CleanupNumericValues { precision: p.float_precision }));
    registry.register("convertTransform", |p| Box::new(ConvertTransform { precision: p.transform_precision }));
    registry.register("removeDimensions", |_| Box::new(RemoveDimensions));
    registry.register("sortAttrs", |_| Box::new(SortAttrs));
}

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"[ \t\r\n]+").unwrap();
}

/// Editor namespaces whose elements and attributes carry no rendering data.
const EDITOR_NAMESPACES: &[&str] = &[
    "http://creativecommons.org/ns#",
    "http://inkscape.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://ns.adobe.com/AdobeIllustrator/10.0/",
    "http://ns.adobe.com/AdobeSVGViewerExtensions/3.0/",
    "http://ns.adobe.com/Extensibility/1.0/",
    "http://ns.adobe.com/Flows/1.0/",
    "http://ns.adobe.com/GenericCustomNamespace/1.0/",
    "http://ns.adobe.com/Graphs/1.0/",
    "http://ns.adobe.com/ImageReplacement/1.0/",
    "http://ns.adobe.com/SaveForWeb/1.0/",
    "http://ns.adobe.com/Variables/1.0/",
    "http://ns.adobe.com/XPath/1.0/",
    "http://purl.org/dc/elements/1.1/",
    "http://schemas.microsoft.com/visio/2003/SVGExtensions/",
    "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://taptrix.com/vectorillustrator/svg_extensions",
    "http://www.bohemiancoding.com/sketch/ns",
    "http://www.figma.com/figma/ns",
    "http://www.inkscape.org/namespaces/inkscape",
    "http://www.serif.com/",
    "http://www.vector.evaxdesign.sk",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
];

const CONTAINER_ELEMENTS: &[&str] = &[
    "a", "defs", "g", "marker", "mask", "missing-glyph", "pattern", "switch", "symbol",
];

/// Conditional processing attributes keep their meaning when empty.
const CONDITIONAL_ATTRS: &[&str] = &["requiredExtensions", "requiredFeatures", "systemLanguage"];

const TRANSFORM_ATTRS: &[&str] = &["transform", "gradientTransform", "patternTransform"];

/// Attribute order used by `sortAttrs` before falling back to name order.
const ATTR_ORDER: &[&str] = &[
    "id", "width", "height", "x", "x1", "x2", "y", "y1", "y2", "cx", "cy", "r", "fill", "stroke",
    "marker", "d", "points",
];

struct RemoveDoctype;

impl Visitor for RemoveDoctype {
    fn document(&mut self, doc: &mut Document) -> OptimizerResult<()> {
        doc.children.retain(|n| !matches!(n, Node::Doctype(_)));
        Ok(())
    }
}

struct RemoveXmlProcInst;

impl Visitor for RemoveXmlProcInst {
    fn document(&mut self, doc: &mut Document) -> OptimizerResult<()> {
        doc.children.retain(|n| match n {
            Node::Declaration(_) => false,
            Node::Instruction { target, .. } => target != "xml",
            _ => true,
        });
        Ok(())
    }
}

/// Drops comments, except `<!--! ... -->` legal notices.
struct RemoveComments;

fn is_removable_comment(node: &Node) -> bool {
    matches!(node, Node::Comment(text) if !text.starts_with('!'))
}

impl Visitor for RemoveComments {
    fn document(&mut self, doc: &mut Document) -> OptimizerResult<()> {
        doc.children.retain(|n| !is_removable_comment(n));
        Ok(())
    }

    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        el.children.retain(|n| !is_removable_comment(n));
        Ok(())
    }
}

/// Removes child elements with any of the given names.
struct RemoveElements(&'static [&'static str]);

impl Visitor for RemoveElements {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        let names = self.0;
        el.children.retain(|n| !n.as_element().is_some_and(|c| names.contains(&c.name.as_str())));
        Ok(())
    }
}

/// Removes descriptions that are empty or editor boilerplate.
struct RemoveDesc;

fn is_boilerplate_desc(el: &Element) -> bool {
    if el.name != "desc" {
        return false;
    }
    let text: String = el
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Text(t) | Node::CData(t) => Some(t.as_str()),
            _ => None,
        })
        .collect();
    let text = text.trim();
    text.is_empty() || text.starts_with("Created with") || text.starts_with("Created using")
}

impl Visitor for RemoveDesc {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        el.children.retain(|n| !n.as_element().is_some_and(is_boilerplate_desc));
        Ok(())
    }
}

#[derive(Default)]
struct RemoveEditorsNsData {
    prefixes: Vec<String>,
}

impl RemoveEditorsNsData {
    fn is_editor_name(&self, name: &str) -> bool {
        name.split_once(':')
            .is_some_and(|(prefix, _)| self.prefixes.iter().any(|p| p == prefix))
    }
}

impl Visitor for RemoveEditorsNsData {
    fn enter(&mut self, el: &mut Element, is_root: bool) -> OptimizerResult<()> {
        if is_root {
            el.attributes.retain(|attr| match attr.name.strip_prefix("xmlns:") {
                Some(prefix) if EDITOR_NAMESPACES.contains(&attr.value.as_str()) => {
                    self.prefixes.push(prefix.to_string());
                    false
                }
                _ => true,
            });
        }

        if self.prefixes.is_empty() {
            return Ok(());
        }
        el.attributes.retain(|attr| !self.is_editor_name(&attr.name));
        el.children.retain(|n| !n.as_element().is_some_and(|c| self.is_editor_name(&c.name)));
        Ok(())
    }
}

/// Collapses whitespace runs in attribute values and trims them.
struct CleanupAttrs;

impl Visitor for CleanupAttrs {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        for attr in el.attributes.iter_mut() {
            if WHITESPACE_RUN.is_match(&attr.value) {
                attr.value = WHITESPACE_RUN.replace_all(&attr.value, " ").trim().to_string();
            }
        }
        Ok(())
    }
}

struct RemoveEmptyAttrs;

impl Visitor for RemoveEmptyAttrs {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        el.attributes
            .retain(|attr| !attr.value.is_empty() || CONDITIONAL_ATTRS.contains(&attr.name.as_str()));
        Ok(())
    }
}

/// Removes childless containers, bottom-up so nested empty groups collapse.
struct RemoveEmptyContainers;

fn is_empty_container(el: &Element) -> bool {
    if !CONTAINER_ELEMENTS.contains(&el.name.as_str()) || !el.children.is_empty() {
        return false;
    }
    match el.name.as_str() {
        // Patterns can inherit content through href, filtered groups still render.
        "pattern" => el.attributes.is_empty(),
        "g" => !el.has_attr("filter"),
        "mask" => !el.has_attr("id"),
        _ => true,
    }
}

impl Visitor for RemoveEmptyContainers {
    fn exit(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        el.children.retain(|n| !n.as_element().is_some_and(is_empty_container));
        Ok(())
    }
}

/// Formats a rounded number without a leading zero (`0.5` → `.5`).
fn compact_number(value: f64, precision: u32) -> String {
    let text = format_number(round_to(value, precision));
    if let Some(rest) = text.strip_prefix("0.") {
        format!(".{rest}")
    } else if let Some(rest) = text.strip_prefix("-0.") {
        format!("-.{rest}")
    } else {
        text
    }
}

/// Unit written after a rounded length; `px` is the default and is dropped.
fn unit_suffix(unit: LengthUnit) -> &'static str {
    match unit {
        LengthUnit::None | LengthUnit::Px => "",
        LengthUnit::Em => "em",
        LengthUnit::Ex => "ex",
        LengthUnit::In => "in",
        LengthUnit::Cm => "cm",
        LengthUnit::Mm => "mm",
        LengthUnit::Pt => "pt",
        LengthUnit::Pc => "pc",
        LengthUnit::Percent => "%",
    }
}

/// Rounds numeric attribute values and drops redundant `px` units.
struct CleanupNumericValues {
    precision: u32,
}

impl Visitor for CleanupNumericValues {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        for attr in el.attributes.iter_mut() {
            if attr.name == "version" {
                continue;
            }

            if attr.name == "viewBox" {
                if let Ok(values) = NumberListParser::from(attr.value.as_str()).collect::<Result<Vec<f64>, _>>() {
                    attr.value = values
                        .iter()
                        .map(|v| compact_number(*v, self.precision))
                        .collect::<Vec<_>>()
                        .join(" ");
                }
                continue;
            }

            let Ok(length) = Length::from_str(&attr.value) else { continue };
            attr.value = format!("{}{}", compact_number(length.number, self.precision), unit_suffix(length.unit));
        }
        Ok(())
    }
}

/// Rounds transform arguments and drops identity transforms.
struct ConvertTransform {
    precision: u32,
}

fn is_identity(kind: &str, args: &[f64]) -> bool {
    match kind {
        "translate" => args.iter().all(|v| *v == 0.0),
        "scale" => args.iter().all(|v| *v == 1.0),
        "rotate" | "skewX" | "skewY" => args.first().is_some_and(|v| *v == 0.0),
        "matrix" => args == [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        _ => false,
    }
}

fn push_transform(out: &mut String, kind: &str, args: &[f64]) {
    if is_identity(kind, args) {
        return;
    }
    let args: Vec<String> = args.iter().map(|v| format_number(*v)).collect();
    out.push_str(&format!("{}({})", kind, args.join(" ")));
}

impl ConvertTransform {
    /// Rewrites a transform list, or `None` when it does not parse.
    fn convert(&self, value: &str) -> Option<String> {
        let tokens = TransformListParser::from(value).collect::<Result<Vec<_>, _>>().ok()?;
        let r = |v: f64| round_to(v, self.precision);

        let mut out = String::new();
        let mut rest = tokens.as_slice();
        while let Some((token, tail)) = rest.split_first() {
            rest = tail;
            match (*token, rest) {
                // rotate(a cx cy) is read as translate, rotate, translate back
                (
                    TransformListToken::Translate { tx, ty },
                    [TransformListToken::Rotate { angle }, TransformListToken::Translate { tx: bx, ty: by }, ..],
                ) if *bx == -tx && *by == -ty => {
                    rest = &rest[2..];
                    if r(*angle) != 0.0 {
                        push_transform(&mut out, "rotate", &[r(*angle), r(tx), r(ty)]);
                    }
                }
                (TransformListToken::Matrix { a, b, c, d, e, f }, _) => {
                    push_transform(&mut out, "matrix", &[r(a), r(b), r(c), r(d), r(e), r(f)]);
                }
                (TransformListToken::Translate { tx, ty }, _) if r(ty) == 0.0 => {
                    push_transform(&mut out, "translate", &[r(tx)]);
                }
                (TransformListToken::Translate { tx, ty }, _) => {
                    push_transform(&mut out, "translate", &[r(tx), r(ty)]);
                }
                (TransformListToken::Scale { sx, sy }, _) if r(sx) == r(sy) => {
                    push_transform(&mut out, "scale", &[r(sx)]);
                }
                (TransformListToken::Scale { sx, sy }, _) => {
                    push_transform(&mut out, "scale", &[r(sx), r(sy)]);
                }
                (TransformListToken::Rotate { angle }, _) => push_transform(&mut out, "rotate", &[r(angle)]),
                (TransformListToken::SkewX { angle }, _) => push_transform(&mut out, "skewX", &[r(angle)]),
                (TransformListToken::SkewY { angle }, _) => push_transform(&mut out, "skewY", &[r(angle)]),
            }
        }
        Some(out)
    }
}

impl Visitor for ConvertTransform {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        for name in TRANSFORM_ATTRS {
            let Some(value) = el.attr(name) else { continue };
            match self.convert(value) {
                Some(converted) if converted.is_empty() => {
                    el.remove_attr(name);
                }
                Some(converted) => el.set_attr(name, converted),
                None => {}
            }
        }
        Ok(())
    }
}

/// Replaces root `width`/`height` with a viewBox.
struct RemoveDimensions;

impl Visitor for RemoveDimensions {
    fn enter(&mut self, el: &mut Element, is_root: bool) -> OptimizerResult<()> {
        if !is_root || el.name != "svg" {
            return Ok(());
        }

        if el.has_attr("viewBox") {
            el.remove_attr("width");
            el.remove_attr("height");
            return Ok(());
        }

        let width = el.attr("width").and_then(parse_leading_number);
        let height = el.attr("height").and_then(parse_leading_number);
        if let (Some(width), Some(height)) = (width, height) {
            el.set_attr("viewBox", format!("0 0 {} {}", format_number(width), format_number(height)));
            el.remove_attr("width");
            el.remove_attr("height");
        }
        Ok(())
    }
}

/// Sorts attributes: namespace declarations, then a fixed order, then by name.
struct SortAttrs;

fn attr_rank(name: &str) -> (usize, usize) {
    if name == "xmlns" {
        return (0, 0);
    }
    if name.starts_with("xmlns:") {
        return (1, 0);
    }
    match ATTR_ORDER.iter().position(|n| *n == name) {
        Some(index) => (2, index),
        None => (3, 0),
    }
}

impl Visitor for SortAttrs {
    fn enter(&mut self, el: &mut Element, _is_root: bool) -> OptimizerResult<()> {
        el.attributes.sort_by(|a, b| {
            attr_rank(&a.name)
                .cmp(&attr_rank(&b.name))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::svg::{WriteOptions, parse_document, traverse, write_document};

    fn run(plugin: &str, svg: &str) -> String {
        let registry = PluginRegistry::with_builtins();
        let params = PluginParams { float_precision: 2, transform_precision: 3 };
        let mut doc = parse_document(svg).unwrap();
        let mut visitor = registry.create(plugin, &params).unwrap();
        traverse(&mut doc, visitor.as_mut()).unwrap();
        write_document(&doc, WriteOptions::default()).unwrap()
    }

    #[test]
    fn test_prolog_plugins() {
        let svg = "<?xml version=\"1.0\"?><!DOCTYPE svg><!--a--><svg><!--b--><!--! keep --><g/></svg>";
        assert_eq!(run("removeDoctype", svg), "<?xml version=\"1.0\"?><!--a--><svg><!--b--><!--! keep --><g/></svg>");
        assert_eq!(run("removeXMLProcInst", svg), "<!DOCTYPE svg><!--a--><svg><!--b--><!--! keep --><g/></svg>");
        assert_eq!(run("removeComments", svg), "<?xml version=\"1.0\"?><!DOCTYPE svg><svg><!--! keep --><g/></svg>");
    }

    #[test]
    fn test_remove_elements() {
        let svg = "<svg><title>t</title><desc>Created with Tool</desc><desc>Real</desc><metadata/></svg>";
        assert_eq!(run("removeTitle", svg), "<svg><desc>Created with Tool</desc><desc>Real</desc><metadata/></svg>");
        assert_eq!(run("removeDesc", svg), "<svg><title>t</title><desc>Real</desc><metadata/></svg>");
        assert_eq!(run("removeMetadata", svg), "<svg><title>t</title><desc>Created with Tool</desc><desc>Real</desc></svg>");
    }

    #[test]
    fn test_remove_editors_ns_data() {
        let svg = concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" inkscape:version="1">"#,
            r#"<inkscape:grid/><rect inkscape:label="x" width="1"/></svg>"#,
        );
        assert_eq!(
            run("removeEditorsNSData", svg),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="1"/></svg>"#
        );
    }

    #[test]
    fn test_attribute_cleanup() {
        assert_eq!(
            run("cleanupAttrs", "<svg><path d=\"  M0 0\n  L1   1 \"/></svg>"),
            r#"<svg><path d="M0 0 L1 1"/></svg>"#
        );
        assert_eq!(
            run("removeEmptyAttrs", r#"<svg><g id="" systemLanguage="" fill="red"/></svg>"#),
            r#"<svg><g systemLanguage="" fill="red"/></svg>"#
        );
    }

    #[test]
    fn test_remove_empty_containers() {
        let svg = r#"<svg><g><g/><defs/></g><g filter="url(#f)"/><rect/></svg>"#;
        assert_eq!(run("removeEmptyContainers", svg), r#"<svg><g filter="url(#f)"/><rect/></svg>"#);
    }

    #[test]
    fn test_cleanup_numeric_values() {
        let svg = r#"<svg version="1.10" viewBox="0.000 0 10.5 20" width="100.456px" height="0.5em"><rect x="-0.333"/></svg>"#;
        assert_eq!(
            run("cleanupNumericValues", svg),
            r#"<svg version="1.10" viewBox="0 0 10.5 20" width="100.46" height=".5em"><rect x="-.33"/></svg>"#
        );
    }

    #[test]
    fn test_convert_transform() {
        let svg = r#"<svg><g transform="translate(0,0) scale(1.23456)"/><g transform="rotate(0)"/><g transform="bogus(1)"/></svg>"#;
        assert_eq!(
            run("convertTransform", svg),
            r#"<svg><g transform="scale(1.235)"/><g/><g transform="bogus(1)"/></svg>"#
        );
    }

    #[test]
    fn test_convert_transform_shorthands() {
        let svg = concat!(
            r#"<svg><g transform="rotate(45 10 -5)"/><g transform="translate(10, 0) scale(2 2)"/>"#,
            r#"<g transform="rotate(0.0001 3 3) skewX(10)"/><g transform="scale(1) translate(1"/></svg>"#,
        );
        assert_eq!(
            run("convertTransform", svg),
            concat!(
                r#"<svg><g transform="rotate(45 10 -5)"/><g transform="translate(10)scale(2)"/>"#,
                r#"<g transform="skewX(10)"/><g transform="scale(1) translate(1"/></svg>"#,
            )
        );
    }

    #[test]
    fn test_cleanup_numeric_units() {
        let svg = r#"<svg><rect x="10.004pt" y="1e1" width="50.556%" height="2mm" fill="red" rx="1e999"/></svg>"#;
        assert_eq!(
            run("cleanupNumericValues", svg),
            r#"<svg><rect x="10pt" y="10" width="50.56%" height="2mm" fill="red" rx="1e999"/></svg>"#
        );
    }

    #[test]
    fn test_remove_dimensions() {
        assert_eq!(
            run("removeDimensions", r#"<svg width="10" height="20"/>"#),
            r#"<svg viewBox="0 0 10 20"/>"#
        );
        assert_eq!(
            run("removeDimensions", r#"<svg width="10" height="20" viewBox="0 0 5 5"/>"#),
            r#"<svg viewBox="0 0 5 5"/>"#
        );
    }

    #[test]
    fn test_sort_attrs() {
        assert_eq!(
            run("sortAttrs", r#"<svg><rect stroke="red" b="1" a="2" x="0" id="r" xmlns:x="u"/></svg>"#),
            r#"<svg><rect xmlns:x="u" id="r" x="0" stroke="red" a="2" b="1"/></svg>"#
        );
    }
}
