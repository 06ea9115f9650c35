//! The `medreport models` command.

use clap::{Args, Subcommand};
use medreport_core::probe::{probe_models, ProbeAttempt, DEFAULT_CANDIDATES};
use medreport_core::{Config, ModelClientFactory};

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model checks.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Try candidate model ids in order and report the first that answers
    Probe {
        /// Model ids to try (defaults to a built-in list of Gemini aliases)
        #[arg(value_name = "MODEL")]
        candidates: Vec<String>,
    },

    /// Show the configured default model for each entry point
    Defaults,
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Probe { candidates } => {
            let client = ModelClientFactory::create(&config.llm)?;
            let candidates = if candidates.is_empty() {
                DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect()
            } else {
                candidates
            };

            println!("Testing model candidates...");
            let found = probe_models(client.as_ref(), &candidates, |attempt| {
                println!("\nTesting: {}", attempt.model());
                match attempt {
                    ProbeAttempt::Available { preview, .. } => println!("  OK      {preview}..."),
                    ProbeAttempt::Failed { reason, .. } => println!("  FAILED  {reason}"),
                }
            })
            .await;

            match found {
                Some(model) => println!("\nWorking model: {model}"),
                None => anyhow::bail!("No working models found in candidate list"),
            }
        }

        ModelsCommand::Defaults => {
            println!("cli    {}", config.models.cli);
            println!("text   {}", config.models.text);
            println!("image  {}", config.models.image);
        }
    }

    Ok(())
}
