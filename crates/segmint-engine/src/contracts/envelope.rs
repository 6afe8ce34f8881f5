use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

/// Wire shape for a failed run. The structured `data` payload travels
/// inside the error contract so consumers find everything under one key.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub error: ErrorContract,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub fn success<T>(command: &str, data: T) -> EngineResult<SuccessEnvelope>
where
    T: Serialize,
{
    let json_data = serde_json::to_value(data)
        .map_err(|err| EngineError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data: json_data,
    })
}

pub fn failure_from_error(error: &EngineError) -> FailureEnvelope {
    FailureEnvelope {
        ok: false,
        error: ErrorContract {
            code: error.code.clone(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
            data: error.data.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EngineError;

    use super::{failure_from_error, success};

    #[test]
    fn success_envelope_carries_command_and_version() {
        let envelope = success("score", serde_json::json!({"rows": []}));
        assert!(envelope.is_ok());
        if let Ok(payload) = envelope {
            assert!(payload.ok);
            assert_eq!(payload.command, "score");
            assert_eq!(payload.version, crate::API_VERSION);
        }
    }

    #[test]
    fn failure_envelope_nests_the_data_payload_under_error() {
        let error = EngineError::degenerate_distribution("recency", 3, 3);
        let failure = failure_from_error(&error);
        assert!(!failure.ok);
        assert_eq!(failure.error.code, "degenerate_distribution");

        let body = serde_json::to_value(&failure).unwrap_or_default();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["data"]["metric"], "recency");
    }

    #[test]
    fn failure_envelope_omits_data_when_the_error_carries_none() {
        let error = EngineError::invalid_argument("bad policy");
        let failure = failure_from_error(&error);

        let body = serde_json::to_value(&failure).unwrap_or_default();
        assert!(body["error"].get("data").is_none());
        assert!(body["error"]["recovery_steps"].is_array());
    }
}
