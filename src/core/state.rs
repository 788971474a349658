//! Per-session application state.

use std::sync::Arc;

use tracing::debug;

use crate::coordinator::{JobCoordinator, ResultSink};
use crate::processing::BulkProcessor;
use crate::utils::OptimizerResult;
use crate::worker::{EngineHandle, SvgEngine};

/// Session state: one engine shared by the single-document coordinator and
/// the bulk processor.
pub struct AppState<E = EngineHandle> {
    engine: Arc<E>,
    coordinator: JobCoordinator<E>,
    bulk: BulkProcessor<E>,
}

impl AppState<EngineHandle> {
    /// Starts the engine thread and wires it into both coordinators.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(sink: Arc<dyn ResultSink>) -> OptimizerResult<Self> {
        let engine = Arc::new(EngineHandle::spawn()?);
        debug!("Engine started");
        Ok(Self::with_engine(engine, sink))
    }
}

impl<E: SvgEngine> AppState<E> {
    pub fn with_engine(engine: Arc<E>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            coordinator: JobCoordinator::new(engine.clone(), sink),
            bulk: BulkProcessor::new(engine.clone()),
            engine,
        }
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn coordinator(&self) -> &JobCoordinator<E> {
        &self.coordinator
    }

    pub fn bulk(&self) -> &BulkProcessor<E> {
        &self.bulk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BulkFile, ResultUpdate, Settings, SvgFile};

    struct NullSink;

    impl ResultSink for NullSink {
        fn show_result(&self, _file: &SvgFile, _update: &ResultUpdate) {}
        fn show_error(&self, _message: &str) {}
    }

    #[tokio::test]
    async fn test_one_engine_serves_both() {
        let state = AppState::new(Arc::new(NullSink)).unwrap();

        state
            .coordinator()
            .open("<svg><g/></svg>".to_string(), "a.svg", &Settings::default())
            .await
            .unwrap();

        let files = vec![BulkFile::from_text("b.svg", "<svg><!--x--></svg>")];
        let report = state.bulk().process_files(files, &Settings::default(), |_| {}).await;
        assert_eq!(report.results[0].data, "<svg/>");
        assert_eq!(state.engine().pending_count(), 0);
    }
}
