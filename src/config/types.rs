//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Token written into a freshly created config file.
pub const PLACEHOLDER_TOKEN: &str = "your_token_here";

/// Root configuration structure, stored as `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Discord bot token. Kept optional so a file without the key
    /// reads as "no token" rather than a parse error.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: Some(PLACEHOLDER_TOKEN.to_string()),
        }
    }
}
