//! Quantify database setup CLI
//!
//! Creates the Quantify MongoDB database and provisions its collections.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quantify_core::catalog;
use quantify_core::config::Config;
use quantify_setup::storage_init;
use quantify_setup::{ProvisionOutcome, SchemaProvisioner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Exit status when the database exists and the policy forbids touching it
const EXIT_ALREADY_EXISTS: u8 = 2;

/// Exit status when `verify` finds the database out of step with the catalog
const EXIT_VERIFY_MISMATCH: u8 = 3;

#[derive(Parser)]
#[command(name = "quantify-setup")]
#[command(about = "Create and provision the Quantify MongoDB database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Apply the collection catalog (the default when no command is given)
    Provision,
    /// Compare the database's collections with the catalog
    Verify,
    /// Print the collection catalog as JSON
    Catalog,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    match cli.command.unwrap_or(Commands::Provision) {
        Commands::Provision => provision_database(cli.config.as_deref()).await,
        Commands::Verify => verify_database(cli.config.as_deref()).await,
        Commands::Catalog => print_catalog(),
    }
}

/// Initialize logging system
///
/// Logs go to stderr so stdout only carries the status line.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "quantify_setup={level},quantify_storage={level},quantify_core={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

/// Run the provisioning procedure once
async fn provision_database(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let target = config.provision.target()?;

    let manager = storage_init::connect(&config.storage).await?;

    let outcome = SchemaProvisioner::new(manager.as_ref())
        .provision(&target, config.provision.reset_policy, catalog())
        .await
        .with_context(|| format!("Failed to provision database '{target}'"))?;

    match &outcome {
        ProvisionOutcome::Success(report) => info!(
            database = %report.database,
            dropped = report.dropped,
            collections = ?report.created,
            "Database provisioned"
        ),
        ProvisionOutcome::AlreadyExists { database } => {
            warn!(%database, "Leaving existing database untouched")
        }
    }

    let (line, code) = outcome_status(&outcome);
    line.print();
    Ok(ExitCode::from(code))
}

/// One line reported to the user, and the stream it belongs on
#[derive(Debug, PartialEq, Eq)]
enum StatusLine {
    Stdout(&'static str),
    Stderr(&'static str),
}

impl StatusLine {
    fn print(&self) {
        match self {
            Self::Stdout(line) => println!("{line}"),
            Self::Stderr(line) => eprintln!("{line}"),
        }
    }
}

/// Status line and exit code for a provisioning outcome
fn outcome_status(outcome: &ProvisionOutcome) -> (StatusLine, u8) {
    match outcome {
        ProvisionOutcome::Success(_) => (StatusLine::Stdout("Success"), 0),
        ProvisionOutcome::AlreadyExists { .. } => (
            StatusLine::Stderr("Database already exists"),
            EXIT_ALREADY_EXISTS,
        ),
    }
}

/// Check the live database against the catalog
async fn verify_database(config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let target = config.provision.target()?;

    let manager = storage_init::connect(&config.storage).await?;
    let diff = storage_init::verify_catalog(manager.as_ref(), &target, catalog()).await?;

    if diff.is_complete() {
        println!("Database '{target}' matches the catalog");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Database '{target}' does not match the catalog");
    for name in &diff.missing {
        println!("  missing:    {name}");
    }
    for name in &diff.unexpected {
        println!("  unexpected: {name}");
    }
    Ok(ExitCode::from(EXIT_VERIFY_MISMATCH))
}

fn print_catalog() -> Result<ExitCode> {
    let json = serde_json::to_string_pretty(catalog()).context("Failed to serialize catalog")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}
