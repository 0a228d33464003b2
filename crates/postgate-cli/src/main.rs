//! postgate - terminal front-end for the postapi backend.
//!
//! Plays the part of the browser pages: collects form fields, runs a login
//! or registration submission, shows the resulting message and "navigates"
//! by printing (and optionally opening) the destination URL.

mod commands;
mod navigator;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::AppContext;
use postgate_core::Config;

/// Log file written in the cache directory
const LOG_FILE: &str = "postgate.log";

#[derive(Parser)]
#[command(name = "postgate")]
#[command(about = "Log in, register and route against a postapi backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides config and POSTGATE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Open navigation targets in the system browser
    #[arg(long, global = true)]
    open: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the login form
    Login {
        /// Username (prompted for when omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Submit the registration form
    Register,

    /// Route to the landing page or the login page depending on the stored session
    Gate,

    /// Show whether a session credential is stored
    Status,

    /// Remove the stored session credential
    Logout,
}

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g., RUST_LOG=debug). Diagnostics
/// also go to a log file so failed submissions can be inspected later.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = Config::load()?;
    let log_dir = config
        .cache_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());
    let _log_guard = init_tracing(log_dir.as_deref());
    debug!(?log_dir, store = ?config.store, "Config loaded");

    let mut ctx = AppContext::new(config, cli.base_url, cli.open)?;
    info!(base_url = %ctx.base_url, "postgate starting");

    let ok = match cli.command {
        Commands::Login { username } => commands::auth::login(&mut ctx, username).await?,
        Commands::Register => commands::auth::register(&mut ctx).await?,
        Commands::Gate => commands::gate::run(&mut ctx),
        Commands::Status => commands::auth::status(&ctx)?,
        Commands::Logout => commands::auth::logout(&ctx)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
