//! Command-line entry points.
//!
//! - [`Cli`]: arguments and settings overrides
//! - [`run`]: optimize one file to stdout or many files into a directory

mod args;
mod optimize;

pub use args::Cli;
pub use optimize::{TerminalSink, optimize_file, optimize_files, run};
