//! Slash command declarations and replies.
//!
//! Commands are declared statically by extensions and dispatched by the
//! session; handlers only build a [`Reply`], sending it is left to the
//! serenity glue in [`crate::discord::client`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serenity::builder::{CreateCommand, CreateEmbed, CreateEmbedFooter};
use serenity::model::application::{InstallationContext, InteractionContext};
use serenity::model::Colour;

/// Data a handler may read when building its reply.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Latest heartbeat round-trip, `None` until the first ACK.
    pub latency: Option<Duration>,
    pub now: DateTime<Utc>,
}

/// Handler invoked when a registered command is matched.
pub trait CommandHandler: Send + Sync {
    fn handle(&self, ctx: &CommandContext) -> Reply;
}

/// Static declaration of a slash command.
#[derive(Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub install_scopes: Vec<InstallationContext>,
    pub contexts: Vec<InteractionContext>,
    pub handler: Arc<dyn CommandHandler>,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("install_scopes", &self.install_scopes)
            .field("contexts", &self.contexts)
            .finish_non_exhaustive()
    }
}

impl CommandSpec {
    /// Build the registration payload sent during command sync.
    pub fn to_create_command(&self) -> CreateCommand {
        CreateCommand::new(self.name)
            .description(self.description)
            .integration_types(self.install_scopes.clone())
            .contexts(self.contexts.clone())
    }
}

/// Rich reply rendered as a single embed.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub title: String,
    pub description: String,
    pub color: Colour,
    pub footer: String,
    pub timestamp: DateTime<Utc>,
}

impl Reply {
    pub fn to_embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .colour(self.color)
            .footer(CreateEmbedFooter::new(&self.footer))
            .timestamp(self.timestamp)
    }
}

/// Format a latency in milliseconds with two decimals (`42.31`).
///
/// An unknown latency is shown as `0.00`.
pub fn format_latency_ms(latency: Option<Duration>) -> String {
    let millis = latency.map(|l| l.as_secs_f64() * 1000.0).unwrap_or(0.0);
    format!("{:.2}", millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_latency_two_decimals() {
        assert_eq!(format_latency_ms(Some(Duration::from_secs_f64(0.04231))), "42.31");
        assert_eq!(format_latency_ms(Some(Duration::from_millis(250))), "250.00");
    }

    #[test]
    fn test_embed_keeps_subsecond_timestamp() {
        let timestamp = DateTime::parse_from_rfc3339("2024-05-01T12:34:56.789Z")
            .unwrap()
            .with_timezone(&Utc);
        let reply = Reply {
            title: "Ping Result".to_string(),
            description: "Bot latency is 42.31 ms".to_string(),
            color: Colour::BLUE,
            footer: "footer".to_string(),
            timestamp,
        };

        let embed = serde_json::to_value(reply.to_embed()).unwrap();
        let rendered = embed["timestamp"].as_str().unwrap();

        assert_eq!(
            DateTime::parse_from_rfc3339(rendered).unwrap().with_timezone(&Utc),
            timestamp
        );
        assert_eq!(embed["description"], "Bot latency is 42.31 ms");
    }

    #[test]
    fn test_format_unknown_latency() {
        assert_eq!(format_latency_ms(None), "0.00");
    }
}
