use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::core::{BulkEvent, BulkFailure, BulkFile, BulkProgress, BulkReport, BulkSuccess, Settings};
use crate::utils::{OptimizerResult, validate_svg_text};
use crate::worker::SvgEngine;

/// Stops a running bulk run from outside it.
pub struct BulkAbortHandle<E> {
    engine: Arc<E>,
    aborted: Arc<AtomicBool>,
}

impl<E> Clone for BulkAbortHandle<E> {
    fn clone(&self) -> Self {
        Self { engine: self.engine.clone(), aborted: self.aborted.clone() }
    }
}

impl<E: SvgEngine> BulkAbortHandle<E> {
    /// Prevents further files from starting and rejects the request in flight.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.engine.cancel_pending();
    }
}

/// Optimizes many files one after another against one engine.
pub struct BulkProcessor<E> {
    engine: Arc<E>,
    aborted: Arc<AtomicBool>,
}

impl<E: SvgEngine> BulkProcessor<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine, aborted: Arc::new(AtomicBool::new(false)) }
    }

    pub fn abort_handle(&self) -> BulkAbortHandle<E> {
        BulkAbortHandle { engine: self.engine.clone(), aborted: self.aborted.clone() }
    }

    /// Aborts the current run, see [`BulkAbortHandle::abort`].
    pub fn abort(&self) {
        self.abort_handle().abort();
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Processes `files` in order with one settings snapshot.
    ///
    /// `on_event` receives a progress signal after every attempted file and a
    /// single completion signal at the end. A file whose request is aborted
    /// mid-flight is neither a success nor a failure.
    pub async fn process_files(
        &self,
        files: Vec<BulkFile>,
        settings: &Settings,
        on_event: impl Fn(BulkEvent) + Send + Sync,
    ) -> BulkReport {
        self.aborted.store(false, Ordering::SeqCst);

        let total = files.len();
        info!("Processing {} files", total);
        let mut report = BulkReport::default();

        for (index, file) in files.iter().enumerate() {
            if self.is_aborted() {
                info!("Bulk run aborted after {}/{} files", index, total);
                break;
            }

            match self.process_file(file, settings).await {
                Ok(success) => {
                    debug!(
                        "{}: {} -> {} bytes",
                        success.filename, success.original_size, success.optimized_size
                    );
                    report.results.push(success);
                }
                Err(e) if e.is_abort() => {
                    debug!("{} skipped: request aborted", file.filename);
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", file.filename, e);
                    report.errors.push(BulkFailure {
                        filename: file.filename.clone(),
                        error: e.to_string(),
                    });
                }
            }

            on_event(BulkEvent::Progress(BulkProgress::new(index + 1, total)));
        }

        if report.errors.is_empty() {
            info!("Bulk run completed: {} files optimized", report.results.len());
        } else {
            warn!(
                "Bulk run completed with {} failed files out of {}",
                report.errors.len(),
                total
            );
        }

        on_event(BulkEvent::Complete(report.clone()));
        report
    }

    async fn process_file(&self, file: &BulkFile, settings: &Settings) -> OptimizerResult<BulkSuccess> {
        let text = file.read_text().await?;
        validate_svg_text(&text)?;

        let original_size = text.len();
        let optimized = self.engine.process(text, settings.clone()).await?;

        Ok(BulkSuccess {
            filename: file.filename.clone(),
            original_size,
            optimized_size: optimized.text.len(),
            data: optimized.text,
        })
    }
}
