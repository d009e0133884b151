//! revassign CLI - reviewer assignment for pull requests
//!
//! Every invocation runs one operation against the configured SQLite
//! database and prints the result as JSON.

mod app;
mod commands;
mod output;
mod telemetry;

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use revassign_core::Config;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;

use app::App;
use commands::{PrArgs, TeamArgs, UserArgs};
use output::{exit_status, ErrorResponse};

/// Assign and rotate pull request reviewers within teams
#[derive(Parser, Debug)]
#[command(name = "revassign")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.config/revassign/config.toml)
    #[arg(long, global = true, env = "REVASSIGN_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config and env)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Request deadline such as `4s` or `500ms` (overrides config and env)
    #[arg(long, global = true, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Show current configuration
    Config,

    /// Manage teams
    Team(TeamArgs),

    /// Manage users
    User(UserArgs),

    /// Create, merge and reassign pull requests
    Pr(PrArgs),

    /// Show assignment counts per user and per pull request
    Stats,
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    revassign_core::config::parse_duration(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load_with_overrides(cli.config.as_deref(), cli.db.clone(), cli.timeout)?;
    let dispatch = telemetry::dispatch(&config.log, cli.verbose);

    run(cli, config).with_subscriber(dispatch).await
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<ExitCode> {
    tracing::debug!(
        database = %config.database.path.display(),
        request_timeout = ?config.service.request_timeout,
        "configuration loaded"
    );

    let result = match cli.command {
        Some(Commands::Version) => {
            println!("revassign {}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Config) => {
            print_config(&config, cli.config.as_deref());
            return Ok(ExitCode::SUCCESS);
        }
        None => {
            println!("revassign - reviewer assignment for pull requests");
            println!();
            println!("Use --help for usage information");
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Team(args)) => {
            let app = App::open(&config, CancellationToken::new()).await?;
            let result = until_interrupted(&app, args.execute(&app)).await;
            app.close().await;
            result
        }
        Some(Commands::User(args)) => {
            let app = App::open(&config, CancellationToken::new()).await?;
            let result = until_interrupted(&app, args.execute(&app)).await;
            app.close().await;
            result
        }
        Some(Commands::Pr(args)) => {
            let app = App::open(&config, CancellationToken::new()).await?;
            let result = until_interrupted(&app, args.execute(&app)).await;
            app.close().await;
            result
        }
        Some(Commands::Stats) => {
            let app = App::open(&config, CancellationToken::new()).await?;
            let result = until_interrupted(&app, commands::stats::execute(&app)).await;
            app.close().await;
            result
        }
    };

    report(result)
}

/// Drive `command` to completion, cancelling its requests on Ctrl-C
///
/// After an interrupt the command is still awaited so it can observe the
/// cancellation and unwind through its own error path.
async fn until_interrupted<F>(app: &App, command: F) -> revassign_core::Result<Value>
where
    F: Future<Output = revassign_core::Result<Value>>,
{
    let cancel = app.context().cancellation_token().clone();
    tokio::pin!(command);

    tokio::select! {
        result = &mut command => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted, cancelling request");
            cancel.cancel();
            command.await
        }
    }
}

fn report(result: revassign_core::Result<Value>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&err))?);
            Ok(ExitCode::from(exit_status(&err)))
        }
    }
}

fn print_config(config: &Config, config_file: Option<&std::path::Path>) {
    println!("revassign Configuration");
    println!("=======================");
    println!();
    println!("Database:");
    println!("  path: {}", config.database.path.display());
    println!("  max_connections: {}", config.database.max_connections);
    println!();
    println!("Service:");
    println!("  request_timeout: {:?}", config.service.request_timeout);
    println!();
    println!("Log:");
    println!("  filter: {}", config.log.filter);
    println!();

    let path = config_file
        .map(std::path::Path::to_path_buf)
        .or_else(Config::default_config_path);
    if let Some(path) = path {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
