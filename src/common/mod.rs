//! Common utilities and types shared across the application.

pub mod error;

pub use error::SessionError;
