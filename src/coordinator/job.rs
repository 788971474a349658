//! Single-document optimize requests with "latest request wins" semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info};

use super::cache::ResultCache;
use crate::core::{ResultUpdate, Settings, SvgFile};
use crate::utils::OptimizerResult;
use crate::worker::SvgEngine;

/// Receives applied results and user-facing errors.
pub trait ResultSink: Send + Sync {
    fn show_result(&self, file: &SvgFile, update: &ResultUpdate);
    fn show_error(&self, message: &str);
}

/// How an optimize request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The result was handed to the sink
    Applied(ResultUpdate),
    /// A newer request was started; nothing was applied
    Superseded,
    /// No document is loaded
    NoInput,
}

struct Input {
    original: SvgFile,
    filename: String,
}

/// Mediates optimize requests between the engine, the cache and the sink.
///
/// Every request mints a job generation. Only a request whose generation is
/// still the latest after each suspension point may apply or cache its
/// result.
pub struct JobCoordinator<E> {
    engine: Arc<E>,
    sink: Arc<dyn ResultSink>,
    cache: Mutex<ResultCache<SvgFile>>,
    input: Mutex<Option<Input>>,
    latest_job: AtomicU64,
}

impl<E: SvgEngine> JobCoordinator<E> {
    pub fn new(engine: Arc<E>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            engine,
            sink,
            cache: Mutex::new(ResultCache::new()),
            input: Mutex::new(None),
            latest_job: AtomicU64::new(0),
        }
    }

    /// Name of the loaded document.
    pub fn filename(&self) -> Option<String> {
        self.input.lock().as_ref().map(|input| input.filename.clone())
    }

    /// The loaded document as it was read.
    pub fn original(&self) -> Option<SvgFile> {
        self.input.lock().as_ref().map(|input| input.original.clone())
    }

    /// Number of cached results for the current document.
    pub fn cached_results(&self) -> usize {
        self.cache.lock().len()
    }

    fn mint_job(&self) -> u64 {
        self.latest_job.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, job: u64) -> bool {
        self.latest_job.load(Ordering::SeqCst) == job
    }

    /// Loads a new document and optimizes it with `settings`.
    ///
    /// Results cached for the previous document are dropped.
    pub async fn open(&self, data: String, filename: &str, settings: &Settings) -> OptimizerResult<JobOutcome> {
        // Anything still running belongs to the previous document.
        self.mint_job();

        let original = match self.engine.wrap_original(data).await {
            Ok(original) => original,
            Err(e) => {
                let e = e.with_context("Load failed");
                self.sink.show_error(&e.to_string());
                return Err(e);
            }
        };

        self.cache.lock().purge();
        *self.input.lock() = Some(Input { original, filename: filename.to_string() });
        info!("Loaded {}", filename);

        self.compress(settings).await
    }

    /// Optimizes the loaded document with `settings`.
    ///
    /// Aborts whatever the engine is still working on for earlier requests.
    /// Superseded and aborted requests end quietly; other failures go to the
    /// sink as `Minifying error: <message>` and are returned.
    pub async fn compress(&self, settings: &Settings) -> OptimizerResult<JobOutcome> {
        let job = self.mint_job();
        self.engine.abort().await;

        if !self.is_current(job) {
            debug!("Job {} superseded before it started", job);
            return Ok(JobOutcome::Superseded);
        }

        let Some(original) = self.original() else {
            return Ok(JobOutcome::NoInput);
        };

        if settings.original {
            let update = self.apply(&original, None, settings)?;
            return Ok(JobOutcome::Applied(update));
        }

        let fingerprint = if settings.fingerprint.is_empty() {
            settings.compute_fingerprint()
        } else {
            settings.fingerprint.clone()
        };

        let cached = self.cache.lock().lookup(&fingerprint);
        if let Some(cached) = cached {
            debug!("Job {} served from cache", job);
            let update = self.apply(&cached, Some(&original), settings)?;
            return Ok(JobOutcome::Applied(update));
        }

        let result = self.engine.process(original.text.clone(), settings.clone()).await;

        if !self.is_current(job) {
            debug!("Job {} superseded, discarding its result", job);
            return Ok(JobOutcome::Superseded);
        }

        match result {
            Ok(optimized) => {
                self.cache.lock().add(&fingerprint, optimized.clone());
                let update = self.apply(&optimized, Some(&original), settings)?;
                Ok(JobOutcome::Applied(update))
            }
            Err(e) if e.is_abort() => {
                debug!("Job {} aborted", job);
                Ok(JobOutcome::Superseded)
            }
            Err(e) => {
                let e = e.with_context("Minifying error");
                self.sink.show_error(&e.to_string());
                Err(e)
            }
        }
    }

    fn apply(&self, file: &SvgFile, original: Option<&SvgFile>, settings: &Settings) -> OptimizerResult<ResultUpdate> {
        let comparison_size = match original {
            Some(original) => Some(original.size(settings.gzip)?),
            None => None,
        };
        let update = ResultUpdate { comparison_size, size: file.size(settings.gzip)? };
        self.sink.show_result(file, &update);
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;
    use crate::core::Dimensions;
    use crate::utils::OptimizerError;

    /// Engine whose "slow" requests wait for the gate to open.
    #[derive(Default)]
    struct GatedEngine {
        gate: Notify,
        waiting: AtomicUsize,
        process_calls: AtomicUsize,
    }

    impl SvgEngine for GatedEngine {
        async fn wrap_original(&self, data: String) -> OptimizerResult<SvgFile> {
            if data.is_empty() {
                return Err(OptimizerError::pipeline("empty document"));
            }
            Ok(SvgFile::new(data, Dimensions::new(10.0, 10.0)))
        }

        async fn process(&self, data: String, settings: Settings) -> OptimizerResult<SvgFile> {
            self.process_calls.fetch_add(1, Ordering::SeqCst);
            match settings.fingerprint.as_str() {
                "slow" => {
                    self.waiting.fetch_add(1, Ordering::SeqCst);
                    self.gate.notified().await;
                }
                "broken" => return Err(OptimizerError::pipeline("bad path data")),
                _ => {}
            }
            Ok(SvgFile::new(format!("{}#{}", &data[..4], settings.fingerprint), Dimensions::default()))
        }

        fn cancel_pending(&self) {}
    }

    #[derive(Default)]
    struct RecordingSink {
        results: Mutex<Vec<(String, ResultUpdate)>>,
        errors: Mutex<Vec<String>>,
    }

    impl ResultSink for RecordingSink {
        fn show_result(&self, file: &SvgFile, update: &ResultUpdate) {
            self.results.lock().push((file.text.clone(), *update));
        }

        fn show_error(&self, message: &str) {
            self.errors.lock().push(message.to_string());
        }
    }

    fn settings(fingerprint: &str) -> Settings {
        Settings { fingerprint: fingerprint.to_string(), ..Settings::default() }
    }

    fn setup() -> (Arc<GatedEngine>, Arc<RecordingSink>, Arc<JobCoordinator<GatedEngine>>) {
        let engine = Arc::new(GatedEngine::default());
        let sink = Arc::new(RecordingSink::default());
        let coordinator = Arc::new(JobCoordinator::new(engine.clone(), sink.clone()));
        (engine, sink, coordinator)
    }

    const DOC: &str = "<svg>0123456789</svg>";

    #[tokio::test]
    async fn test_latest_request_wins() {
        let (engine, sink, coordinator) = setup();
        coordinator.open(DOC.to_string(), "a.svg", &settings("initial")).await.unwrap();
        sink.results.lock().clear();

        let first = coordinator.clone();
        let t1 = tokio::spawn(async move { first.compress(&settings("slow")).await });
        while engine.waiting.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = coordinator.compress(&settings("fast")).await.unwrap();
        assert!(matches!(second, JobOutcome::Applied(_)));

        // Let the first request finish after the second one
        engine.gate.notify_one();
        assert_eq!(t1.await.unwrap().unwrap(), JobOutcome::Superseded);

        let results = sink.results.lock();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "<svg#fast");
        // The stale result was not cached either
        assert_eq!(coordinator.cached_results(), 2);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_engine() {
        let (engine, sink, coordinator) = setup();
        coordinator.open(DOC.to_string(), "a.svg", &settings("one")).await.unwrap();
        coordinator.compress(&settings("two")).await.unwrap();
        coordinator.compress(&settings("one")).await.unwrap();

        assert_eq!(engine.process_calls.load(Ordering::SeqCst), 2);
        let texts: Vec<String> = sink.results.lock().iter().map(|(t, _)| t.clone()).collect();
        assert_eq!(texts, vec!["<svg#one", "<svg#two", "<svg#one"]);

        // A new document drops the cached results
        coordinator.open(DOC.to_string(), "b.svg", &settings("one")).await.unwrap();
        assert_eq!(engine.process_calls.load(Ordering::SeqCst), 3);
        assert_eq!(coordinator.filename().as_deref(), Some("b.svg"));
    }

    #[tokio::test]
    async fn test_original_bypasses_engine() {
        let (engine, sink, coordinator) = setup();
        let mut show_original = settings("any");
        coordinator.open(DOC.to_string(), "a.svg", &show_original).await.unwrap();

        show_original.original = true;
        let outcome = coordinator.compress(&show_original).await.unwrap();
        assert_eq!(
            outcome,
            JobOutcome::Applied(ResultUpdate { comparison_size: None, size: DOC.len() })
        );
        assert_eq!(engine.process_calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.results.lock().last().unwrap().0, DOC);
    }

    #[tokio::test]
    async fn test_sizes() {
        let (_engine, sink, coordinator) = setup();
        coordinator.open(DOC.to_string(), "a.svg", &settings("fp")).await.unwrap();
        let (text, update) = sink.results.lock()[0].clone();
        assert_eq!(update, ResultUpdate { comparison_size: Some(DOC.len()), size: text.len() });
    }

    #[tokio::test]
    async fn test_errors_are_prefixed() {
        let (_engine, sink, coordinator) = setup();
        let err = coordinator.open(String::new(), "empty.svg", &settings("fp")).await.unwrap_err();
        assert_eq!(err.to_string(), "Load failed: empty document");

        coordinator.open(DOC.to_string(), "a.svg", &settings("fp")).await.unwrap();
        let err = coordinator.compress(&settings("broken")).await.unwrap_err();
        assert_eq!(err.to_string(), "Minifying error: bad path data");

        assert_eq!(
            *sink.errors.lock(),
            vec!["Load failed: empty document", "Minifying error: bad path data"]
        );
    }

    #[tokio::test]
    async fn test_no_input() {
        let (engine, _sink, coordinator) = setup();
        assert_eq!(coordinator.compress(&settings("fp")).await.unwrap(), JobOutcome::NoInput);
        assert_eq!(engine.process_calls.load(Ordering::SeqCst), 0);
    }
}
