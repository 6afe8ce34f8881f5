pub mod date;
pub mod metrics;
pub mod policy;
pub mod quartile;
pub mod score;
pub mod types;
