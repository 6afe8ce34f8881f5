pub mod parse;
pub mod source;

pub use parse::{RawTransaction, parse_source};
pub use source::resolve_source;

use crate::error::EngineError;

pub(crate) fn invalid_input_error(message: &str) -> EngineError {
    EngineError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide a CSV file with headers or a JSON array via path or stdin.".to_string(),
            "Run `segmint template` to get a valid example file.".to_string(),
        ],
    )
}
