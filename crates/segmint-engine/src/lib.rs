pub mod commands;
pub mod contracts;
pub mod error;
pub mod export;
pub mod input;
pub mod rfm;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{EngineError, EngineResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
