//! The engine thread: owns the pipeline and answers requests in arrival order.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::error::{WorkerError, WorkerResult};
use super::messages::{Outcome, Payload, Request, Response};
use crate::processing::SvgOptimizer;

/// Starts the engine on its own OS thread.
///
/// The thread exits once every request sender is dropped, or when nobody
/// listens for responses anymore.
pub(crate) fn spawn_engine(
    optimizer: SvgOptimizer,
    requests: UnboundedReceiver<Request>,
    responses: UnboundedSender<Response>,
) -> WorkerResult<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("svg-engine".to_string())
        .spawn(move || run(optimizer, requests, responses))?;
    Ok(handle)
}

fn run(optimizer: SvgOptimizer, mut requests: UnboundedReceiver<Request>, responses: UnboundedSender<Response>) {
    info!("SVG engine started");

    while let Some(request) = requests.blocking_recv() {
        let id = request.id();
        debug!("Engine handling request {} ({})", id, request.action());

        let outcome = handle_request(&optimizer, request);
        if let Outcome::Error(message) = &outcome {
            debug!("Request {} failed: {}", id, message);
        }

        if responses.send(Response { id, outcome }).is_err() {
            warn!("Response channel closed, stopping engine");
            break;
        }
    }

    info!("SVG engine stopped");
}

/// Runs one request; a panic becomes that request's error.
pub(crate) fn handle_request(optimizer: &SvgOptimizer, request: Request) -> Outcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| match request {
        Request::WrapOriginal { data, .. } => optimizer.wrap_original(&data).map(Payload::Dimensions),
        Request::Process { data, settings, .. } => {
            optimizer.optimize(&data, &settings).map(Payload::Optimized)
        }
    }));

    match result {
        Ok(result) => result.into(),
        Err(panic) => Outcome::Error(WorkerError::Panicked(panic_message(panic.as_ref())).to_string()),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
