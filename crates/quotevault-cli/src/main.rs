//! # quotevault
//!
//! Command-line front end for QuoteVault.
//!
//! With `QUOTEVAULT_API_URL` set every command talks to the hosted backend
//! as the signed-in user; otherwise it works against a local SQLite database
//! that can be filled with `quotevault seed <file>`.

mod commands;
mod run;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use quotevault_client::auth::SessionStore;
use quotevault_client::{AppState, ClientConfig};
use quotevault_shared::QuoteVaultError;

use crate::commands::Cli;

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("quotevault=info,quotevault_client=debug,quotevault_store=info,warn")
        }))
        .init();

    let cli = Cli::parse();
    if let Err(e) = start(cli).await {
        match e.downcast_ref::<QuoteVaultError>() {
            Some(err) => eprintln!("error [{}]: {err}", err.kind()),
            None => eprintln!("error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config.api_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(db) = &cli.db {
        config.db_path = Some(db.clone());
    }
    if let Some(user) = cli.user {
        config.local_user_id = user;
    }
    debug!(?config, "loaded configuration");

    let session_path = quotevault_store::database::data_dir()?.join("session.json");
    let session = SessionStore::load(&session_path)?;

    let state = AppState::connect(config, session.clone())?;
    if let Some(auth) = &state.auth {
        if let Err(e) = auth.refresh_if_needed().await {
            tracing::warn!(error = %e, "session refresh failed");
        }
    }

    let result = run::dispatch(&state, cli.command).await;
    // Sign-in, sign-out and reset requests all change the stored session.
    session.save(&session_path)?;
    result
}
