pub mod score;
pub mod template;
