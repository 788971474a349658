use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::engine::SvgEngine;
use super::error::WorkerError;
use super::messages::{Payload, Request, Response};
use super::thread::spawn_engine;
use crate::core::{Settings, SvgFile};
use crate::processing::SvgOptimizer;
use crate::utils::{OptimizerError, OptimizerResult};

type Waiter = oneshot::Sender<OptimizerResult<Payload>>;
type PendingMap = Arc<Mutex<HashMap<u64, Waiter>>>;

/// Client side of the engine thread.
///
/// Each call gets a fresh id and a waiter in the pending map; a router task
/// matches responses to waiters by id. Responses whose waiter is gone (because
/// the request was aborted) are dropped.
pub struct EngineHandle {
    requests: mpsc::UnboundedSender<Request>,
    pending: PendingMap,
    next_id: AtomicU64,
}

impl EngineHandle {
    /// Starts an engine with the built-in plugins.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> OptimizerResult<Self> {
        Self::spawn_with(SvgOptimizer::new())
    }

    /// Starts an engine around `optimizer`.
    pub fn spawn_with(optimizer: SvgOptimizer) -> OptimizerResult<Self> {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        spawn_engine(optimizer, request_rx, response_tx)?;

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        tokio::spawn(route_responses(response_rx, pending.clone()));

        Ok(Self {
            requests: request_tx,
            pending,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(&self, build: impl FnOnce(u64) -> Request) -> OptimizerResult<Payload> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        if self.requests.send(build(id)).is_err() {
            self.pending.lock().remove(&id);
            return Err(WorkerError::Disconnected.into());
        }

        rx.await.map_err(|_| OptimizerError::from(WorkerError::Disconnected))?
    }

    /// Number of requests still waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

async fn route_responses(mut responses: mpsc::UnboundedReceiver<Response>, pending: PendingMap) {
    while let Some(Response { id, outcome }) = responses.recv().await {
        let waiter = pending.lock().remove(&id);
        match waiter {
            Some(waiter) => {
                let _ = waiter.send(outcome.into_result());
            }
            None => debug!("Dropping response {} of an aborted request", id),
        }
    }

    // Engine is gone: fail whatever is still waiting.
    pending.lock().clear();
}

impl SvgEngine for EngineHandle {
    async fn wrap_original(&self, data: String) -> OptimizerResult<SvgFile> {
        let text = data.clone();
        match self.call(|id| Request::WrapOriginal { id, data }).await? {
            Payload::Dimensions(dimensions) => Ok(SvgFile::new(text, dimensions)),
            Payload::Optimized(_) => Err(WorkerError::UnexpectedResponse("wrapOriginal").into()),
        }
    }

    async fn process(&self, data: String, settings: Settings) -> OptimizerResult<SvgFile> {
        match self.call(|id| Request::Process { id, data, settings }).await? {
            Payload::Optimized(optimized) => Ok(optimized.into()),
            Payload::Dimensions(_) => Err(WorkerError::UnexpectedResponse("process").into()),
        }
    }

    fn cancel_pending(&self) {
        let waiters: Vec<Waiter> = self.pending.lock().drain().map(|(_, waiter)| waiter).collect();
        if !waiters.is_empty() {
            debug!("Aborting {} pending engine request(s)", waiters.len());
        }
        for waiter in waiters {
            let _ = waiter.send(Err(OptimizerError::Aborted));
        }
    }
}
