//! Coordination of single-document optimize requests.

mod cache;
mod job;

pub use cache::{CACHE_CAPACITY, ResultCache};
pub use job::{JobCoordinator, JobOutcome, ResultSink};
