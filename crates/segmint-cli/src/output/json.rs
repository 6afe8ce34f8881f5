use std::io;

use segmint_engine::contracts::envelope::failure_from_error;
use segmint_engine::{EngineError, SuccessEnvelope};
use serde::Serialize;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

/// Failures go over the wire as the engine's failure envelope, so the
/// text and JSON paths describe the same error contract.
pub fn render_error_json(error: &EngineError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use segmint_engine::{EngineError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    #[test]
    fn success_json_keeps_the_envelope_shape() {
        let payload = SuccessEnvelope {
            ok: true,
            command: "score".to_string(),
            version: "0.1.0".to_string(),
            data: json!({"as_of": "2026-06-01", "rows": []}),
        };

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["command"], Value::String("score".to_string()));
                assert_eq!(value["data"]["as_of"], "2026-06-01");
            }
        }
    }

    #[test]
    fn error_json_uses_the_failure_envelope() {
        let error = EngineError::invalid_argument("bad policy");
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(false));
                assert_eq!(
                    value["error"]["code"],
                    Value::String("invalid_argument".to_string())
                );
                assert!(value["error"]["recovery_steps"].is_array());
            }
        }
    }

    #[test]
    fn error_json_carries_structured_data_when_present() {
        let error = EngineError::degenerate_distribution("recency", 3, 3);
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["error"]["data"]["metric"], "recency");
            }
        }
    }
}
