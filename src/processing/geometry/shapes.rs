use super::bbox::{BoundingBox, include_point};
use super::path::path_bounds;
use crate::processing::svg::Element;
use crate::utils::{parse_leading_number, parse_number_tokens};

/// Elements that contribute to the visible content box.
pub const SHAPE_ELEMENTS: &[&str] = &[
    "rect", "circle", "ellipse", "line", "polyline", "polygon", "path", "text", "image", "use",
];

/// Default size assumed for `text`, `image` and `use` without explicit size.
const DEFAULT_BOX_SIZE: f64 = 100.0;

pub fn is_shape(name: &str) -> bool {
    SHAPE_ELEMENTS.contains(&name)
}

/// Approximate bounds of a shape element.
///
/// Returns `None` for elements outside [`SHAPE_ELEMENTS`], for shapes with a
/// negative size or radius, and for point lists or paths that draw nothing.
pub fn shape_bounds(el: &Element) -> Option<BoundingBox> {
    let num = |name: &str, default: f64| {
        el.attr(name).and_then(parse_leading_number).unwrap_or(default)
    };

    match el.name.as_str() {
        "rect" => BoundingBox::from_rect(num("x", 0.0), num("y", 0.0), num("width", 0.0), num("height", 0.0)),
        "circle" => {
            let (cx, cy, r) = (num("cx", 0.0), num("cy", 0.0), num("r", 0.0));
            BoundingBox::new(cx - r, cy - r, cx + r, cy + r)
        }
        "ellipse" => {
            let (cx, cy) = (num("cx", 0.0), num("cy", 0.0));
            let (rx, ry) = (num("rx", 0.0), num("ry", 0.0));
            BoundingBox::new(cx - rx, cy - ry, cx + rx, cy + ry)
        }
        "line" => {
            let (x1, y1, x2, y2) = (num("x1", 0.0), num("y1", 0.0), num("x2", 0.0), num("y2", 0.0));
            BoundingBox::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
        }
        "polyline" | "polygon" => point_list_bounds(el.attr("points")?),
        "path" => path_bounds(el.attr("d")),
        "text" | "image" | "use" => BoundingBox::from_rect(
            num("x", 0.0),
            num("y", 0.0),
            num("width", DEFAULT_BOX_SIZE),
            num("height", DEFAULT_BOX_SIZE),
        ),
        _ => None,
    }
}

/// Bounds of a `points` list; pairs with a non-numeric member are skipped.
fn point_list_bounds(points: &str) -> Option<BoundingBox> {
    let values = parse_number_tokens(points);

    let mut bounds = None;
    for pair in values.chunks_exact(2) {
        if let (Some(x), Some(y)) = (pair[0], pair[1]) {
            include_point(&mut bounds, x, y);
        }
    }
    bounds
}
