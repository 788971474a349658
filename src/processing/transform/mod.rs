//! Post-optimization transforms: viewBox trimming, resizing and dimension
//! extraction.

mod dimensions;
mod resize;
mod trim;

pub use dimensions::{DimensionsExtractor, element_dimensions, extract_dimensions};
pub use resize::{Resize, ResizeOptions};
pub use trim::TrimWhitespace;
