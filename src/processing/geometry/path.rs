//! Conservative bounds for path data.
//!
//! Curves are bounded by their control points and arcs by boxes of their radii
//! around both endpoints, so the result always covers the drawn path but may
//! be larger than it.

use svgtypes::{PathParser, PathSegment};
use tracing::trace;

use super::bbox::{BoundingBox, include_point};

/// What walking a path produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathGeometry {
    /// Box over every visited point, `None` when no coordinate was visited
    pub bounds: Option<BoundingBox>,
    /// Cursor position after the last command
    pub end: (f64, f64),
}

struct Tracer {
    x: f64,
    y: f64,
    start_x: f64,
    start_y: f64,
    bounds: Option<BoundingBox>,
}

impl Tracer {
    fn resolve(&self, abs: bool, x: f64, y: f64) -> (f64, f64) {
        if abs { (x, y) } else { (self.x + x, self.y + y) }
    }

    fn touch(&mut self, x: f64, y: f64) {
        include_point(&mut self.bounds, x, y);
    }

    fn move_to(&mut self, (x, y): (f64, f64)) {
        self.x = x;
        self.y = y;
        self.touch(x, y);
    }

    fn visit(&mut self, segment: PathSegment) {
        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                self.move_to(self.resolve(abs, x, y));
                self.start_x = self.x;
                self.start_y = self.y;
            }
            PathSegment::LineTo { abs, x, y } | PathSegment::SmoothQuadratic { abs, x, y } => {
                self.move_to(self.resolve(abs, x, y));
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = if abs { x } else { self.x + x };
                self.move_to((x, self.y));
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let y = if abs { y } else { self.y + y };
                self.move_to((self.x, y));
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let (cx1, cy1) = self.resolve(abs, x1, y1);
                let (cx2, cy2) = self.resolve(abs, x2, y2);
                let end = self.resolve(abs, x, y);
                self.touch(cx1, cy1);
                self.touch(cx2, cy2);
                self.move_to(end);
            }
            PathSegment::SmoothCurveTo { abs, x2: cx, y2: cy, x, y }
            | PathSegment::Quadratic { abs, x1: cx, y1: cy, x, y } => {
                let (cx, cy) = self.resolve(abs, cx, cy);
                let end = self.resolve(abs, x, y);
                self.touch(cx, cy);
                self.move_to(end);
            }
            PathSegment::EllipticalArc { abs, rx, ry, x, y, .. } => {
                let (rx, ry) = (rx.abs(), ry.abs());
                let (x0, y0) = (self.x, self.y);
                let (x1, y1) = self.resolve(abs, x, y);
                self.touch(x0 - rx, y0 - ry);
                self.touch(x0 + rx, y0 + ry);
                self.touch(x1 - rx, y1 - ry);
                self.touch(x1 + rx, y1 + ry);
                self.move_to((x1, y1));
            }
            PathSegment::ClosePath { .. } => {
                self.x = self.start_x;
                self.y = self.start_y;
            }
        }
    }
}

/// Walks path data `d`, tracking the cursor and the visited bounds.
///
/// Parsing stops at the first malformed segment; everything before it counts.
pub fn analyze_path(d: &str) -> PathGeometry {
    let mut t = Tracer { x: 0.0, y: 0.0, start_x: 0.0, start_y: 0.0, bounds: None };

    for segment in PathParser::from(d) {
        match segment {
            Ok(segment) => t.visit(segment),
            Err(e) => {
                trace!("Path data ends early: {}", e);
                break;
            }
        }
    }

    PathGeometry { bounds: t.bounds, end: (t.x, t.y) }
}

/// Bounds of path data, `None` when the data is absent or draws nothing.
pub fn path_bounds(d: Option<&str>) -> Option<BoundingBox> {
    analyze_path(d?).bounds
}
