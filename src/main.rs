//! Pingbot - a minimal Discord bot.
//!
//! Connects to the Discord gateway, activates the extensions listed in the
//! extension directory and answers `/ping` with the gateway latency.

mod common;
mod config;
mod discord;
mod extensions;
mod logging;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use common::SessionError;
use config::env::{apply_env_override, get_config_path, get_extensions_dir, get_log_path};
use discord::BotSession;
use extensions::Catalog;

#[tokio::main]
async fn main() -> Result<()> {
    // Dropping the guard flushes buffered file logs.
    let log_guard = logging::init_logging(get_log_path())?;

    info!("Pingbot v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);
    let token = apply_env_override(config::load_token(&config_path));

    let catalog = Catalog::builtin();
    debug!("Known extensions: {:?}", catalog.identifiers().collect::<Vec<_>>());
    let mut session = BotSession::new(get_extensions_dir(), catalog);
    let token = match session.begin_connect(token.as_deref()) {
        Ok(token) => token.to_string(),
        Err(e) => {
            error!("{}", e);
            error!("Please set a valid Discord token in {}", config_path);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let session = Arc::new(Mutex::new(session));
    let result = discord::run(session.clone(), &token).await;
    info!("Session ended in state {:?}", session.lock().await.state());

    if let Err(e) = result {
        match e.downcast_ref::<SessionError>() {
            Some(SessionError::Authentication { .. }) => {
                error!("Invalid Discord token, please check {}: {}", config_path, e);
            }
            _ => error!("Discord client failed: {:#}", e),
        }
        drop(log_guard);
        std::process::exit(1);
    }

    info!("Exiting...");
    Ok(())
}
