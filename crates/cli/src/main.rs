//! `ShopHere` CLI - interactive marketplace client and session tools.
//!
//! # Usage
//!
//! ```bash
//! # Start an interactive session
//! shophere shell
//!
//! # Inspect or clear the durable session record
//! shophere session show
//! shophere session clear
//!
//! # List the seeded demo accounts
//! shophere accounts
//! ```
//!
//! # Commands
//!
//! - `shell` - Sign in, browse pages, fill a cart and check out
//! - `session show` / `session clear` - Durable session record maintenance
//! - `accounts` - Demo accounts and their password

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shophere_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "shophere")]
#[command(author, version, about = "ShopHere marketplace client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive client session
    Shell,
    /// Manage the durable session record
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// List the seeded demo accounts
    Accounts,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the stored session entries
    Show,
    /// Remove the stored session
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shophere_storefront=info,shophere_cli=info".into());

    // Logs go to stderr so shell output stays readable.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Shell => commands::shell::run(config).await?,
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show(&config)?,
            SessionAction::Clear => commands::session::clear(&config)?,
        },
        Commands::Accounts => commands::accounts::list()?,
    }
    Ok(())
}
