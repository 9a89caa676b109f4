//! Discord bot integration.
//!
//! This module provides the session lifecycle, the slash command surface
//! and the serenity glue that drives them.

pub mod client;
pub mod commands;
pub mod session;

// Re-export main types for external use
pub use client::run;
pub use session::BotSession;
