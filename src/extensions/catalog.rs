//! Statically declared extensions.

use std::collections::BTreeMap;

use crate::common::error::ExtensionError;
use crate::discord::commands::CommandSpec;
use crate::extensions::ping::PingExtension;

/// A unit bundling one or more command handlers.
pub trait Extension: Send + Sync {
    /// Identifier as it appears in the manifest (`extensions.ping`).
    fn name(&self) -> &'static str;

    /// Commands contributed when the extension is activated.
    fn commands(&self) -> Vec<CommandSpec>;
}

type Constructor = fn() -> Box<dyn Extension>;

/// Mapping from extension identifier to constructor.
pub struct Catalog {
    entries: BTreeMap<&'static str, Constructor>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Catalog of every extension shipped with the bot.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(PingExtension::NAME, || Box::new(PingExtension));
        catalog
    }

    pub fn register(&mut self, id: &'static str, constructor: Constructor) {
        self.entries.insert(id, constructor);
    }

    /// Instantiate the extension registered under `id`.
    pub fn resolve(&self, id: &str) -> Result<Box<dyn Extension>, ExtensionError> {
        self.entries
            .get(id)
            .map(|constructor| constructor())
            .ok_or_else(|| ExtensionError::NotFound { id: id.to_string() })
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_ping() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.identifiers().collect::<Vec<_>>(), vec!["extensions.ping"]);

        let extension = catalog.resolve("extensions.ping").unwrap();
        assert_eq!(extension.name(), "extensions.ping");
        assert_eq!(extension.commands().len(), 1);
    }

    #[test]
    fn test_new_catalog_is_empty() {
        assert_eq!(Catalog::new().identifiers().count(), 0);
        assert!(Catalog::new().resolve("extensions.ping").is_err());
    }

    #[test]
    fn test_unknown_extension_fails() {
        let result = Catalog::builtin().resolve("extensions.music");
        assert!(matches!(result, Err(ExtensionError::NotFound { ref id }) if id == "extensions.music"));
    }
}
