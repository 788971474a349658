//! SVG optimizer library.
//!
//! A plugin pipeline over a small SVG tree, an engine thread that runs it,
//! and the coordinators that drive the engine for single documents and bulk
//! runs.

pub mod commands;
pub mod coordinator;
pub mod core;
pub mod processing;
pub mod utils;
pub mod worker;

pub use crate::coordinator::{JobCoordinator, JobOutcome, ResultSink};
pub use crate::core::{AppState, BulkFile, BulkReport, Settings, SvgFile};
pub use crate::processing::{BulkProcessor, SvgOptimizer};
pub use crate::utils::{OptimizerError, OptimizerResult};
pub use crate::worker::{EngineHandle, SvgEngine};
