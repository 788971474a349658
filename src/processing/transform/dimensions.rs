use crate::core::Dimensions;
use crate::processing::svg::{Document, Element, Visitor};
use crate::utils::{OptimizerResult, parse_leading_number, parse_number_list};

/// Width and height (third and fourth values) of a viewBox.
///
/// A malformed entry ends the list, so later values read as missing.
pub(crate) fn viewbox_size(viewbox: &str) -> (Option<f64>, Option<f64>) {
    let mut values = parse_number_list(viewbox).skip(2);
    (values.next(), values.next())
}

/// Reads the size of a root `svg` element.
///
/// Explicit `width` and `height` win when both are present; otherwise the
/// viewBox size is used. Missing or unreadable values stay `None`.
pub fn element_dimensions(el: &Element) -> Dimensions {
    if let (Some(width), Some(height)) = (el.attr("width"), el.attr("height")) {
        return Dimensions {
            width: parse_leading_number(width),
            height: parse_leading_number(height),
        };
    }

    match el.attr("viewBox") {
        Some(viewbox) => {
            let (width, height) = viewbox_size(viewbox);
            Dimensions { width, height }
        }
        None => Dimensions::default(),
    }
}

/// Dimensions of a parsed document, empty unless its root is `svg`.
pub fn extract_dimensions(doc: &Document) -> Dimensions {
    doc.root()
        .filter(|root| root.name == "svg")
        .map(element_dimensions)
        .unwrap_or_default()
}

/// Pass that records the root dimensions as it goes by.
#[derive(Debug, Default)]
pub struct DimensionsExtractor {
    pub dimensions: Dimensions,
}

impl Visitor for DimensionsExtractor {
    fn enter(&mut self, el: &mut Element, is_root: bool) -> OptimizerResult<()> {
        if is_root && el.name == "svg" {
            self.dimensions = element_dimensions(el);
        }
        Ok(())
    }
}
