//! Bounding-box geometry for paths and basic shapes.

mod bbox;
mod path;
mod shapes;

pub use bbox::{BoundingBox, include_point, merge_bounds};
pub use path::{PathGeometry, analyze_path, path_bounds};
pub use shapes::{SHAPE_ELEMENTS, is_shape, shape_bounds};
