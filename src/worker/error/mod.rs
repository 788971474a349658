use crate::utils::OptimizerError;

/// Failures of the engine thread itself, as opposed to failures of a request.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Engine thread failed to start: {0}")]
    SpawnError(String),

    #[error("Engine is not running")]
    Disconnected,

    #[error("Engine panicked: {0}")]
    Panicked(String),

    #[error("Unexpected response for {0}")]
    UnexpectedResponse(&'static str),
}

pub type WorkerResult<T> = Result<T, WorkerError>;

impl From<std::io::Error> for WorkerError {
    fn from(err: std::io::Error) -> Self {
        WorkerError::SpawnError(err.to_string())
    }
}

impl From<WorkerError> for OptimizerError {
    fn from(err: WorkerError) -> Self {
        OptimizerError::engine(err.to_string())
    }
}
