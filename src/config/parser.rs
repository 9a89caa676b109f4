//! Configuration file parsing (JSON format).

use std::fs;
use std::path::Path;

use tracing::{error, warn};

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Load configuration from a JSON file.
///
/// A missing file is replaced by the default config and reported as
/// [`ConfigError::Missing`].
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        write_default_config(path)?;
        return Err(ConfigError::Missing {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_str(&content).map_err(|e| ConfigError::Invalid {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load configuration from a JSON string.
pub fn load_config_str(content: &str) -> Result<Config, serde_json::Error> {
    serde_json::from_str(content)
}

/// Write the default config (placeholder token) to `path`.
pub fn write_default_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let io_error = |e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    };

    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    serde::Serialize::serialize(&Config::default(), &mut serializer).map_err(|e| {
        io_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;

    fs::write(path, content).map_err(io_error)
}

/// Load the bot token, logging instead of failing.
///
/// Returns `None` when the file was missing (a default is written), could
/// not be read or parsed, or has no `token` key. The token itself is
/// returned verbatim; the caller decides whether it is usable.
pub fn load_token(path: impl AsRef<Path>) -> Option<String> {
    match load_config(path) {
        Ok(config) => config.token,
        Err(e @ ConfigError::Missing { .. }) => {
            warn!("{}", e);
            None
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            None
        }
    }
}
