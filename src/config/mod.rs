//! Configuration loading, environment overrides and token validation.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

pub use parser::load_token;
pub use validate::validate_token;
