//! Discord bot client abstraction.
//!
//! Wires the [`BotSession`] into serenity: builds the client, forwards
//! gateway events to the session, and implements [`Platform`] on top of a
//! serenity [`Context`].

use std::sync::Arc;
use std::time::Duration;

use serenity::async_trait;
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::gateway::{ActivityData, GatewayError, ShardManager};
use serenity::http::{HttpBuilder, HttpError};
use serenity::model::application::{Command, CommandInteraction, Interaction};
use serenity::model::gateway::Ready;
use serenity::model::user::OnlineStatus;
use serenity::prelude::*;
use serenity::Client;
use tokio::signal;
use tracing::{debug, info, warn};

use crate::common::error::{SessionError, SessionResult};
use crate::discord::commands::CommandSpec;
use crate::discord::session::{BotSession, Platform, ReadyInfo};

/// Gives event handlers access to the shard manager for latency lookups.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

/// Forwards serenity events to the shared session.
struct SessionEvents {
    session: Arc<Mutex<BotSession>>,
}

#[async_trait]
impl EventHandler for SessionEvents {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);

        let platform = SerenityPlatform::new(&ctx);
        let info = ReadyInfo {
            user: ready.user.tag(),
            guild_count: ready.guilds.len(),
        };

        let mut session = self.session.lock().await;
        session.on_ready(&platform, &info).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if let Err(e) = self.handle_command(&ctx, &command).await {
            self.session
                .lock()
                .await
                .record_lifecycle_failure("interaction_create", &e);
        }
    }
}

impl SessionEvents {
    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) -> SessionResult<()> {
        let name = command.data.name.as_str();
        debug!("/{} invoked by {}", name, command.user.name);

        let latency = shard_latency(ctx).await;
        // Release the session before talking to Discord.
        let reply = self.session.lock().await.dispatch(name, latency);
        let Some(reply) = reply else {
            warn!("Received unknown command /{}", name);
            return Ok(());
        };

        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().embed(reply.to_embed()),
        );
        command
            .create_response(&ctx.http, response)
            .await
            .map_err(|e| SessionError::CommandSend {
                command: name.to_string(),
                source: e,
            })
    }
}

/// [`Platform`] backed by a live serenity context.
pub struct SerenityPlatform<'a> {
    ctx: &'a Context,
}

impl<'a> SerenityPlatform<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Platform for SerenityPlatform<'_> {
    async fn sync_commands(&self, commands: &[CommandSpec]) -> SessionResult<usize> {
        let payload = commands.iter().map(CommandSpec::to_create_command).collect();
        let registered = Command::set_global_commands(&self.ctx.http, payload).await?;
        Ok(registered.len())
    }

    async fn set_presence(&self, activity: &str) -> SessionResult<()> {
        self.ctx
            .set_presence(Some(ActivityData::playing(activity)), OnlineStatus::Online);
        Ok(())
    }

    async fn latency(&self) -> Option<Duration> {
        shard_latency(self.ctx).await
    }
}

/// Heartbeat round-trip of the shard that delivered `ctx`.
async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let manager = {
        let data = ctx.data.read().await;
        data.get::<ShardManagerContainer>()?.clone()
    };
    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id)?.latency
}

async fn build_client(token: &str, session: Arc<Mutex<BotSession>>) -> anyhow::Result<Client> {
    let intents = GatewayIntents::non_privileged();

    // Build a custom reqwest client with timeout settings
    let reqwest_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let http = HttpBuilder::new(token).client(reqwest_client).build();

    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .event_handler(SessionEvents { session })
        .await?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    Ok(client)
}

/// Connect and run until the gateway closes or the process is interrupted.
///
/// A rejected token is returned as [`SessionError::Authentication`] and is
/// never retried.
pub async fn run(session: Arc<Mutex<BotSession>>, token: &str) -> anyhow::Result<()> {
    let mut client = build_client(token, session.clone()).await?;
    let shard_manager = client.shard_manager.clone();

    tokio::select! {
        result = client.start() => match result {
            Ok(()) => {
                info!("Discord client disconnected normally");
                Ok(())
            }
            Err(e) => {
                let error = classify_start_error(e);
                session.lock().await.mark_disconnected(&error);
                Err(error.into())
            }
        },
        _ = shutdown_signal() => {
            info!("Shutting down Discord gateway...");
            shard_manager.shutdown_all().await;
            Ok(())
        }
    }
}

fn classify_start_error(e: serenity::Error) -> SessionError {
    if is_authentication_failure(&e) {
        SessionError::Authentication {
            message: e.to_string(),
        }
    } else {
        SessionError::Serenity(e)
    }
}

/// Whether Discord rejected our token, over the gateway or over HTTP.
pub fn is_authentication_failure(e: &serenity::Error) -> bool {
    match e {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => true,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            response.status_code.as_u16() == 401
        }
        _ => false,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
