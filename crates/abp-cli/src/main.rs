//! `abp` binary entry point.

use abp_cli::access::{self, AccessArgs, AccessCommands};
use abp_cli::doctor::{self, DoctorArgs};
use abp_cli::history::{self, HistoryArgs};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Back-office platform operator tooling.
#[derive(Parser, Debug)]
#[command(name = "abp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Permission simulation against a snapshot.
    Access(AccessArgs),
    /// Merged version timeline of an aggregate.
    History(HistoryArgs),
    /// Referential-invariant checks.
    Doctor(DoctorArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Access(args) => match args.command {
            AccessCommands::Check(check) => {
                let report = access::run_check(&check)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            AccessCommands::Explain(explain) => {
                let grants = access::run_explain(&explain)?;
                println!("{}", serde_json::to_string_pretty(&grants)?);
            }
        },
        Commands::History(args) => {
            let page = history::run(&args)?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Doctor(args) => {
            let report = doctor::run(&args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_healthy() {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
