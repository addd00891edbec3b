//! # stayscore
//!
//! Command-line entry point for the stayscore guest rating skill.
//!
//! - `serve`: run the webhook the voice platform calls
//! - `invoke`: answer a single request envelope from a file or stdin
//! - `health`: check configuration and bundled assets
//! - `locale`: print a localized prompt

mod health;
mod invoke;
mod locale_cli;
mod serve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stayscore_core::SkillConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stayscore", version, about = "Hotel guest rating voice skill")]
struct Cli {
    /// Config file (default: stayscore.yml in the working directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the skill webhook server
    Serve(serve::ServeArgs),

    /// Answer one request envelope and print the response envelope
    Invoke(invoke::InvokeArgs),

    /// Check configuration and bundled assets
    Health(health::HealthArgs),

    /// Print a localized prompt
    Locale(locale_cli::LocaleArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => serve::execute(config, args).await,
        Commands::Invoke(args) => invoke::execute(config, args).await,
        Commands::Health(args) => health::execute(&config, args),
        Commands::Locale(args) => locale_cli::execute(&config, args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "stayscore=debug,stayscore_core=debug,tower_http=debug"
    } else {
        "stayscore=info,stayscore_core=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr so `invoke` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<SkillConfig> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    SkillConfig::load(explicit, &root).context("Failed to load configuration")
}
