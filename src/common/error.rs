//! Error types for the application.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file '{path}' not found, a default one was written")]
    Missing { path: String },

    #[error("Failed to parse config '{path}': {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Extension discovery and activation errors.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("Extension directory '{path}' not found, created an empty one")]
    DirectoryMissing { path: String },

    #[error("Failed to enumerate extension directory '{path}': {source}")]
    Enumeration {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Extension '{id}' is not a known extension")]
    NotFound { id: String },

    #[error("Extension '{id}' is already active")]
    AlreadyActive { id: String },

    #[error("Command '/{command}' from extension '{id}' is already registered")]
    DuplicateCommand { id: String, command: String },
}

/// Session lifecycle errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No Discord token configured")]
    MissingToken,

    #[error("Discord token has not been configured (still using placeholder)")]
    PlaceholderToken,

    #[error("Discord rejected the token: {message}")]
    Authentication { message: String },

    #[error("Event '{event}' failed: {message}")]
    LifecycleEvent { event: String, message: String },

    #[error("Failed to send reply to /{command}: {source}")]
    CommandSend {
        command: String,
        #[source]
        source: serenity::Error,
    },

    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Result type alias for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
