//! Bot session lifecycle.
//!
//! The session owns everything the bot knows about its connection: the
//! lifecycle state, the activated extensions, the command table and the last
//! measured latency. It never talks to serenity directly; the Ready sequence
//! goes through the [`Platform`] trait so it can run against a fake.

use std::collections::BTreeMap;
use std::error::Error as _;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serenity::async_trait;
use tracing::{debug, error, info, warn};

use crate::common::error::{ExtensionError, SessionError, SessionResult};
use crate::config::validate_token;
use crate::discord::commands::{format_latency_ms, CommandContext, CommandSpec, Reply};
use crate::extensions::{self, Catalog};

/// Activity name shown once the bot is ready.
pub const READY_ACTIVITY: &str = "Ready!";

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Ready,
    /// A lifecycle event failed; the connection is still up.
    Degraded,
}

/// Operations the Ready sequence needs from the chat platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Replace the remote command set, returning how many were registered.
    async fn sync_commands(&self, commands: &[CommandSpec]) -> SessionResult<usize>;

    /// Show a "playing" activity.
    async fn set_presence(&self, activity: &str) -> SessionResult<()>;

    async fn latency(&self) -> Option<Duration>;
}

/// What the gateway told us about ourselves on Ready.
#[derive(Debug, Clone, Default)]
pub struct ReadyInfo {
    pub user: String,
    pub guild_count: usize,
}

/// Result of one Ready step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Failed(String),
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done)
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Done => write!(f, "ok"),
            StepOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Aggregated outcome of the Ready sequence.
#[derive(Debug, Clone)]
pub struct ReadyReport {
    pub activations: Vec<(String, StepOutcome)>,
    pub sync: StepOutcome,
    pub presence: StepOutcome,
}

impl ReadyReport {
    pub fn failures(&self) -> usize {
        self.activations
            .iter()
            .map(|(_, outcome)| outcome)
            .chain([&self.sync, &self.presence])
            .filter(|outcome| !outcome.is_done())
            .count()
    }
}

pub struct BotSession {
    state: SessionState,
    extensions_dir: PathBuf,
    catalog: Catalog,
    active: Vec<String>,
    commands: BTreeMap<&'static str, CommandSpec>,
    latency: Option<Duration>,
}

impl BotSession {
    pub fn new(extensions_dir: impl Into<PathBuf>, catalog: Catalog) -> Self {
        Self {
            state: SessionState::Disconnected,
            extensions_dir: extensions_dir.into(),
            catalog,
            active: Vec::new(),
            commands: BTreeMap::new(),
            latency: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Identifiers of activated extensions, in activation order.
    pub fn active_extensions(&self) -> &[String] {
        &self.active
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Validate the token and move to `Connecting`.
    ///
    /// An absent, blank or placeholder token leaves the session
    /// `Disconnected`; the caller is expected to exit.
    pub fn begin_connect<'a>(&mut self, token: Option<&'a str>) -> SessionResult<&'a str> {
        let token = validate_token(token)?;
        self.state = SessionState::Connecting;
        info!("Connecting to Discord...");
        Ok(token)
    }

    /// The gateway dropped us for good (e.g. the token was rejected).
    pub fn mark_disconnected(&mut self, reason: &SessionError) {
        error!("Session disconnected: {}", reason);
        self.state = SessionState::Disconnected;
    }

    /// Activate one extension and register its commands.
    ///
    /// Either all of the extension's commands are registered or none are.
    /// Returns the name the extension reports for itself.
    pub fn activate(&mut self, id: &str) -> Result<&'static str, ExtensionError> {
        if self.active.iter().any(|active| active == id) {
            return Err(ExtensionError::AlreadyActive { id: id.to_string() });
        }

        let extension = self.catalog.resolve(id)?;
        let commands = extension.commands();

        if let Some(taken) = commands
            .iter()
            .find(|command| self.commands.contains_key(command.name))
        {
            return Err(ExtensionError::DuplicateCommand {
                id: id.to_string(),
                command: taken.name.to_string(),
            });
        }

        for command in commands {
            self.commands.insert(command.name, command);
        }
        self.active.push(id.to_string());
        Ok(extension.name())
    }

    /// Run the Ready sequence: activate extensions, sync commands, set
    /// presence. Every step runs even when an earlier one failed.
    pub async fn on_ready(&mut self, platform: &dyn Platform, info: &ReadyInfo) -> ReadyReport {
        self.state = SessionState::Ready;

        let manifest = extensions::scan(&self.extensions_dir);
        let mut activations = Vec::with_capacity(manifest.len());
        for id in manifest {
            let outcome = match self.activate(&id) {
                Ok(name) => {
                    info!("Loaded extension: {}", name);
                    StepOutcome::Done
                }
                Err(e) => {
                    error!("Failed to load extension {}: {}", id, e);
                    StepOutcome::Failed(e.to_string())
                }
            };
            activations.push((id, outcome));
        }

        info!("Syncing slash commands...");
        let commands: Vec<CommandSpec> = self.commands().cloned().collect();
        let sync = match platform.sync_commands(&commands).await {
            Ok(count) => {
                info!("Synced {} slash command(s)", count);
                StepOutcome::Done
            }
            Err(e) => {
                error!("Failed to sync slash commands: {}", e);
                StepOutcome::Failed(e.to_string())
            }
        };

        let presence = match platform.set_presence(READY_ACTIVITY).await {
            Ok(()) => StepOutcome::Done,
            Err(e) => {
                error!("Failed to set presence: {}", e);
                StepOutcome::Failed(e.to_string())
            }
        };

        self.latency = platform.latency().await;
        info!("{} is online", info.user);
        info!("Latency: {}ms", format_latency_ms(self.latency));
        info!("Joined {} guild(s)", info.guild_count);
        info!("Active extensions: {:?}", self.active_extensions());

        let report = ReadyReport {
            activations,
            sync,
            presence,
        };
        debug!("Ready report: sync {}, presence {}", report.sync, report.presence);
        if report.failures() > 0 {
            let failure = SessionError::LifecycleEvent {
                event: "ready".to_string(),
                message: format!("{} step(s) failed", report.failures()),
            };
            self.record_lifecycle_failure("ready", &failure);
        }
        report
    }

    /// Log a failed lifecycle event; a ready session becomes degraded but
    /// stays connected.
    pub fn record_lifecycle_failure(&mut self, event: &str, failure: &SessionError) {
        error!("Event {} failed: {}", event, failure);
        let mut source = failure.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }

        if self.state == SessionState::Ready {
            warn!("Session degraded after failure in {}", event);
            self.state = SessionState::Degraded;
        }
    }

    /// Build the reply for command `name`, or `None` if nothing handles it.
    ///
    /// Without a fresh measurement the last known latency is used.
    pub fn dispatch(&mut self, name: &str, latency: Option<Duration>) -> Option<Reply> {
        let latency = latency.or(self.latency);
        let command = self.commands.get(name)?;
        let ctx = CommandContext {
            latency,
            now: Utc::now(),
        };
        let reply = command.handler.handle(&ctx);
        self.latency = latency;
        Some(reply)
    }
}
