//! The `ping` extension: replies with the gateway latency.

use std::sync::Arc;

use serenity::model::application::{InstallationContext, InteractionContext};
use serenity::model::Colour;

use crate::discord::commands::{format_latency_ms, CommandContext, CommandHandler, CommandSpec, Reply};
use crate::extensions::catalog::Extension;

pub struct PingExtension;

impl PingExtension {
    pub const NAME: &'static str = "extensions.ping";
}

impl Extension for PingExtension {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![CommandSpec {
            name: "ping",
            description: "Check the bot latency",
            install_scopes: vec![InstallationContext::Guild, InstallationContext::User],
            contexts: vec![
                InteractionContext::Guild,
                InteractionContext::PrivateChannel,
                InteractionContext::BotDm,
            ],
            handler: Arc::new(PingHandler),
        }]
    }
}

/// Handler for `/ping`.
pub struct PingHandler;

impl CommandHandler for PingHandler {
    fn handle(&self, ctx: &CommandContext) -> Reply {
        Reply {
            title: "Ping Result".to_string(),
            description: format!("Bot latency is {} ms", format_latency_ms(ctx.latency)),
            color: Colour::BLUE,
            footer: "Powered by pingbot".to_string(),
            timestamp: ctx.now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;

    #[test]
    fn test_ping_reply_contains_latency() {
        let now = Utc::now();
        let ctx = CommandContext {
            latency: Some(Duration::from_secs_f64(0.04231)),
            now,
        };

        let reply = PingHandler.handle(&ctx);

        assert!(reply.description.contains("42.31"));
        assert_eq!(reply.title, "Ping Result");
        assert_eq!(reply.color, Colour::BLUE);
        assert_eq!(reply.timestamp, now);
        assert!(!reply.footer.is_empty());
    }

    #[test]
    fn test_ping_declares_install_scopes_and_contexts() {
        let commands = PingExtension.commands();
        let ping = &commands[0];

        assert_eq!(ping.name, "ping");
        assert_eq!(ping.install_scopes, vec![InstallationContext::Guild, InstallationContext::User]);
        assert_eq!(ping.contexts.len(), 3);
        assert!(ping.contexts.contains(&InteractionContext::BotDm));
    }
}
