//! medreport CLI - turns raw medical report text or report images into
//! structured, patient-friendly JSON by delegating to a Gemini model.
//!
//! # Usage
//!
//! ```bash
//! # Process report text
//! medreport --text "Hemoglobin 10.2 g/dL"
//!
//! # Process a text file or an image
//! medreport --file report.txt
//! medreport --image scan.jpg --model gemini-2.5-flash
//!
//! # Run the HTTP service
//! medreport serve --port 8000
//!
//! # Find a model id that currently answers
//! medreport models probe
//! ```

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// Medical Report Simplifier Engine (Gemini powered).
#[derive(Parser, Debug)]
#[command(name = "medreport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(subcommand_negates_reqs = true)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .multiple(false)
        .args(["text", "file", "image"])
))]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "MEDREPORT_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    report: cli::report::ReportArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands. Without one, the report flags are processed.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve(cli::serve::ServeArgs),

    /// Check which model identifiers answer
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = cli::load_config(cli.config.as_deref())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("medreport v{}", medreport_core::VERSION);

    match cli.command {
        Some(Commands::Serve(args)) => cli::serve::execute(args, config).await,
        Some(Commands::Models(args)) => cli::models::execute(args, config).await,
        Some(Commands::Config(args)) => cli::config::execute(args, cli.config).await,
        None => cli::report::execute(cli.report, config).await,
    }
}
