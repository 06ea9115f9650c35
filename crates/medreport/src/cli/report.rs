//! Default command: process one report from the command line.

use clap::Args;
use medreport_core::{Config, ReportError, ReportImage, ReportInput, ReportProcessor};
use std::path::{Path, PathBuf};

/// Report input flags. Exactly one of `--text`, `--file`, `--image` is required.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Raw medical report text to process
    #[arg(long, value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub text: Option<String>,

    /// Path to a text file containing the report
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Path to an image file (JPG/PNG) containing the report
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Gemini model to use (defaults to `models.cli` from config)
    #[arg(long)]
    pub model: Option<String>,
}

/// Execute the report command.
pub async fn execute(args: ReportArgs, config: Config) -> anyhow::Result<()> {
    let input = read_input(&args).await?;

    let processor = ReportProcessor::from_config(&config.llm)?;
    let model = args.model.unwrap_or(config.models.cli);

    tracing::info!("Processing report using {model}...");
    let outcome = processor.process(&input, &model).await;
    if let Some(message) = outcome.failure_message() {
        tracing::warn!("Report processing failed: {message}");
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Turn whichever input flag was given into a [`ReportInput`].
async fn read_input(args: &ReportArgs) -> anyhow::Result<ReportInput> {
    if let Some(path) = &args.image {
        let image = ReportImage::open(path)
            .await
            .map_err(|e| anyhow::anyhow!("Error opening image {}: {e}", path.display()))?;
        let (width, height) = image.dimensions();
        tracing::debug!(width, height, mime = image.mime_type(), "Loaded report image");
        return Ok(ReportInput::Image(image));
    }
    if let Some(path) = &args.file {
        return Ok(ReportInput::Text(read_text_file(path).await?));
    }
    match &args.text {
        Some(text) => Ok(ReportInput::Text(text.clone())),
        None => anyhow::bail!("You must provide either --text, --file, or --image"),
    }
}

async fn read_text_file(path: &Path) -> Result<String, ReportError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReportError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
