//! Environment variable overrides for configuration.
//!
//! - `PINGBOT_CONFIG` - path of the config file
//! - `PINGBOT_DISCORD_TOKEN` - Discord bot token, takes precedence over the file
//! - `PINGBOT_EXTENSIONS_DIR` - directory scanned for extensions
//! - `PINGBOT_LOG_FILE` - log file path

use std::env;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "PINGBOT";

/// Get the config file path from environment or use default.
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "config.json".to_string())
}

/// Get the extension directory from environment or use default.
pub fn get_extensions_dir() -> String {
    env::var(format!("{}_EXTENSIONS_DIR", ENV_PREFIX)).unwrap_or_else(|_| "extensions".to_string())
}

/// Get the log file path from environment or use default.
pub fn get_log_path() -> String {
    env::var(format!("{}_LOG_FILE", ENV_PREFIX)).unwrap_or_else(|_| "discord_bot.log".to_string())
}

/// Replace the file token with `PINGBOT_DISCORD_TOKEN` when it is set.
pub fn apply_env_override(token: Option<String>) -> Option<String> {
    override_token(token, env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)).ok())
}

/// An override wins only when it is non-empty.
fn override_token(token: Option<String>, env_token: Option<String>) -> Option<String> {
    match env_token {
        Some(env_token) if !env_token.is_empty() => Some(env_token),
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_prefix() {
        assert_eq!(ENV_PREFIX, "PINGBOT");
    }

    #[test]
    fn test_override_replaces_file_token() {
        let result = override_token(Some("file".to_string()), Some("env".to_string()));
        assert_eq!(result.as_deref(), Some("env"));
    }

    #[test]
    fn test_override_fills_absent_token() {
        let result = override_token(None, Some("env".to_string()));
        assert_eq!(result.as_deref(), Some("env"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let result = override_token(Some("file".to_string()), Some(String::new()));
        assert_eq!(result.as_deref(), Some("file"));
        assert_eq!(override_token(None, None), None);
    }
}
