//! Error types for the SVG optimizer.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;
use serde::Serialize;

/// Validation errors for inputs and settings.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ValidationError {
    /// The input lacks a closing `</svg>` tag
    #[error("Not a valid SVG file")]
    NotSvg,
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Main error type for the optimizer.
///
/// Every failure crossing the engine boundary is converted to this type, so
/// it stays `Clone` and serializable.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum OptimizerError {
    /// Input or settings validation failed
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A plugin pass or transform failed
    #[error("{0}")]
    Pipeline(String),

    /// The request was superseded or cancelled before its result was used
    #[error("Request aborted")]
    Aborted,

    /// The engine thread is gone or returned something unexpected
    #[error("Engine error: {0}")]
    Engine(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),
}

/// Convenience result type for optimizer operations.
pub type OptimizerResult<T> = Result<T, OptimizerError>;

// Helper methods for error creation
impl OptimizerError {
    pub fn pipeline<T: Into<String>>(msg: T) -> Self {
        Self::Pipeline(msg.into())
    }

    pub fn engine<T: Into<String>>(msg: T) -> Self {
        Self::Engine(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    /// Whether this error belongs to the abort/superseded class that callers swallow.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Prefixes the message with `prefix`, e.g. `Minifying error: <message>`.
    ///
    /// The result is a [`OptimizerError::Pipeline`] carrying the full text, so the
    /// prefixed message is what reaches the user.
    pub fn with_context(self, prefix: &str) -> Self {
        Self::Pipeline(format!("{prefix}: {self}"))
    }
}

impl ValidationError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

// Convert std::io::Error to OptimizerError
impl From<io::Error> for OptimizerError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<serde_json::Error> for OptimizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(ValidationError::Settings(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_prefix() {
        let err = OptimizerError::pipeline("Unknown plugin \"nope\"").with_context("Minifying error");
        assert_eq!(err.to_string(), "Minifying error: Unknown plugin \"nope\"");
    }

    #[test]
    fn test_abort_classification() {
        assert!(OptimizerError::Aborted.is_abort());
        assert!(!OptimizerError::pipeline("boom").is_abort());
        assert!(!OptimizerError::from(ValidationError::NotSvg).is_abort());
    }

    #[test]
    fn test_validation_message() {
        let err: OptimizerError = ValidationError::NotSvg.into();
        assert_eq!(err.to_string(), "Not a valid SVG file");
    }
}
