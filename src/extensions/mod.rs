//! Extensions: units bundling one or more slash commands.
//!
//! The extension directory only selects which entries of the static
//! [`Catalog`] are activated; no code is loaded from disk.

pub mod catalog;
pub mod ping;
pub mod registry;

pub use catalog::Catalog;
pub use registry::scan;
