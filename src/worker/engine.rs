use std::future::Future;

use crate::core::{Settings, SvgFile};
use crate::utils::OptimizerResult;

/// The engine seen from the coordinators.
///
/// [`EngineHandle`](super::EngineHandle) is the real implementation; anything
/// answering these calls can stand in for it.
pub trait SvgEngine: Send + Sync {
    /// Wraps an unmodified document with its dimensions.
    fn wrap_original(&self, data: String) -> impl Future<Output = OptimizerResult<SvgFile>> + Send;

    /// Optimizes a document.
    fn process(&self, data: String, settings: Settings) -> impl Future<Output = OptimizerResult<SvgFile>> + Send;

    /// Rejects every outstanding request with [`OptimizerError::Aborted`](crate::utils::OptimizerError::Aborted).
    ///
    /// Work already running on the engine is not interrupted; its result is
    /// dropped when it arrives.
    fn cancel_pending(&self);

    /// Cancels outstanding requests, then yields once so tasks awaiting them
    /// get a chance to run. It does not wait for those tasks to finish.
    fn abort(&self) -> impl Future<Output = ()> + Send {
        self.cancel_pending();
        tokio::task::yield_now()
    }
}
