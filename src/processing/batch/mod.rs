mod processor;

pub use processor::{BulkAbortHandle, BulkProcessor};
