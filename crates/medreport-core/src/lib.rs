//! medreport core - request shaping and response interpretation for the
//! medical report simplifier.
//!
//! The crate does no medical processing of its own. It forwards report text or
//! a report image to a generative model together with a fixed instruction
//! template, then hands back the model's JSON or a structured error record.
//!
//! ```text
//! Input (text | image) → ReportProcessor → ModelClient (Gemini) → JSON | error record
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use medreport_core::{Config, ReportInput, ReportProcessor};
//!
//! #[tokio::main]
//! async fn main() -> medreport_core::Result<()> {
//!     let config = Config::load()?;
//!     let processor = ReportProcessor::from_config(&config.llm)?;
//!
//!     let input = ReportInput::Text("Hemoglobin 10.2 g/dL".to_string());
//!     let outcome = processor.process(&input, &config.models.cli).await;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod probe;
pub mod processor;
pub mod prompt;
pub mod report_image;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, MedReportError, ReportError, ReportResult, Result};
pub use llm::{GeminiClient, ModelClient, ModelClientFactory};
pub use processor::ReportProcessor;
pub use report_image::ReportImage;
pub use types::{ReportFailure, ReportInput, ReportOutcome};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
