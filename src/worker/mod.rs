//! The optimization engine: a dedicated thread reached through messages.

mod engine;
mod error;
mod handle;
mod messages;
mod thread;

pub use engine::SvgEngine;
pub use error::{WorkerError, WorkerResult};
pub use handle::EngineHandle;
pub use messages::{Outcome, Payload, Request, Response};
