//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`AppState`]: Per-session state owning the shared engine
//! - [`Settings`]: Configuration for SVG optimization
//! - [`SvgFile`]: A document together with its dimensions
//! - [`BulkFile`]: One input of a bulk run
//! - [`BulkEvent`]: Progress and completion signals of a bulk run

mod state;
mod types;
mod task;
mod progress;

pub use state::AppState;
pub use types::{
    Dimensions, OptimizedSvg, PluginToggles, ResultUpdate, Settings, SvgFile, TransformSettings,
};
pub use task::{BulkFile, FileSource};
pub use progress::{BulkEvent, BulkFailure, BulkProgress, BulkReport, BulkSuccess};
