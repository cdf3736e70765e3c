mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::economics::EconomicsArgs;
use commands::reference::ReferenceCheckArgs;
use commands::sensitivity::SensitivityArgs;

/// Bridge-loan underwriting economics
#[derive(Parser)]
#[command(
    name = "bridgeloan",
    version,
    about = "Bridge-loan underwriting economics",
    long_about = "Computes bridge-loan term sheet figures with decimal precision: \
                  max loan, initial advance, fees, interest reserve, cash to close \
                  and required proof of capital. Also runs the term sheet \
                  reference check and sensitivity sweeps."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log pipeline stages to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute loan economics for a deal scenario
    Economics(EconomicsArgs),
    /// Recompute the recorded term sheet and compare figures
    ReferenceCheck(ReferenceCheckArgs),
    /// Sweep one or two scenario fields and tabulate a figure
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(cli.verbose) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let mut reference_run = false;
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Economics(args) => commands::economics::run_economics(args),
        Commands::ReferenceCheck(args) => {
            reference_run = true;
            commands::reference::run_reference_check(args)
        }
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("bridgeloan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            if reference_run && commands::reference::failed(&value) {
                eprintln!("{}: reference check failed", "error".red().bold());
                process::exit(1);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
