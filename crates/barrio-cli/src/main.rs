//! Barrio terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Persist the session in barrio.redb; one known account
//! barrio --account a@b.com:secret:tok-456
//!
//! # Never write the store, discard late sign-in results
//! barrio --db /tmp/session.redb --read-only --latest-wins
//! ```

use std::{io, sync::Arc};

use barrio_app::{Runtime, SessionController};
use barrio_cli::{AccountSpec, ConsoleDriver, LocalIdentityProvider};
use barrio_core::{DEFAULT_TOKEN_KEY, SessionConfig, SignInOrdering, TokenPersistence};
use barrio_store::RedbTokenStore;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Barrio session client
#[derive(Parser, Debug)]
#[command(name = "barrio")]
#[command(about = "Sign in, sign out and inspect the persisted Barrio session")]
#[command(version)]
struct Args {
    /// Path to the token database
    #[arg(long, default_value = "barrio.redb")]
    db: String,

    /// Key the session token is stored under
    #[arg(long, default_value = DEFAULT_TOKEN_KEY)]
    token_key: String,

    /// Known account, as email:password:token (repeatable)
    #[arg(long = "account")]
    accounts: Vec<AccountSpec>,

    /// Read the stored token at startup but never write it
    #[arg(long)]
    read_only: bool,

    /// Discard sign-in results that were overtaken by a newer request
    #[arg(long)]
    latest_wins: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            token_key: self.token_key.clone(),
            persistence: if self.read_only {
                TokenPersistence::ReadOnly
            } else {
                TokenPersistence::ReadWrite
            },
            ordering: if self.latest_wins {
                SignInOrdering::LatestIssued
            } else {
                SignInOrdering::CompletionOrder
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so they never interleave with rendered screens
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let config = args.session_config();
    let store = RedbTokenStore::open(&args.db)?;
    let provider = LocalIdentityProvider::new(args.accounts);

    tracing::info!(db = %args.db, accounts = provider.len(), "barrio starting");
    if provider.is_empty() {
        tracing::warn!("no --account given, every sign-in will be rejected");
    }

    let controller = Arc::new(SessionController::new(store, provider, config));
    let driver = ConsoleDriver::new(BufReader::new(tokio::io::stdin()), io::stdout());

    Runtime::new(driver, controller).run().await?;

    Ok(())
}
