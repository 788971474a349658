//! Request/response messages exchanged with the engine thread.

use serde::{Deserialize, Serialize};

use crate::core::{Dimensions, OptimizedSvg, Settings};
use crate::utils::{OptimizerError, OptimizerResult};

/// A request addressed to the engine, dispatched on `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Read the dimensions of an unmodified document
    WrapOriginal { id: u64, data: String },
    /// Run the optimization pipeline
    Process { id: u64, data: String, settings: Settings },
}

impl Request {
    pub fn id(&self) -> u64 {
        match self {
            Request::WrapOriginal { id, .. } | Request::Process { id, .. } => *id,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Request::WrapOriginal { .. } => "wrapOriginal",
            Request::Process { .. } => "process",
        }
    }
}

/// Exactly one is sent per request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Result(Payload),
    Error(String),
}

/// Result value of a successful request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Optimized(OptimizedSvg),
    Dimensions(Dimensions),
}

impl Outcome {
    /// Error messages cross the channel as plain text and come back as
    /// pipeline errors.
    pub fn into_result(self) -> OptimizerResult<Payload> {
        match self {
            Outcome::Result(payload) => Ok(payload),
            Outcome::Error(message) => Err(OptimizerError::pipeline(message)),
        }
    }
}

impl From<OptimizerResult<Payload>> for Outcome {
    fn from(result: OptimizerResult<Payload>) -> Self {
        match result {
            Ok(payload) => Outcome::Result(payload),
            Err(e) => Outcome::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = Request::WrapOriginal { id: 7, data: "<svg/>".into() };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"action": "wrapOriginal", "id": 7, "data": "<svg/>"})
        );

        let parsed: Request = serde_json::from_value(json!({
            "action": "process",
            "id": 8,
            "data": "<svg/>",
            "settings": {"multipass": true}
        })).unwrap();
        assert_eq!(parsed.id(), 8);
        assert_eq!(parsed.action(), "process");
        match parsed {
            Request::Process { settings, .. } => assert!(settings.multipass),
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_response_wire_format() {
        let ok = Response { id: 1, outcome: Outcome::Result(Payload::Dimensions(Dimensions::new(2.0, 3.0))) };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"id": 1, "result": {"width": 2.0, "height": 3.0}})
        );

        let err = Response { id: 2, outcome: Outcome::Error("boom".into()) };
        assert_eq!(serde_json::to_value(&err).unwrap(), json!({"id": 2, "error": "boom"}));

        let back: Response = serde_json::from_value(json!({"id": 2, "error": "boom"})).unwrap();
        assert_eq!(back, err);
        assert_eq!(back.outcome.into_result(), Err(OptimizerError::pipeline("boom")));
    }
}
