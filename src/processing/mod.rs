pub mod batch;
pub mod geometry;
pub mod plugins;
pub mod svg;
pub mod transform;
mod optimizer;

pub use batch::{BulkAbortHandle, BulkProcessor};
pub use optimizer::SvgOptimizer;
