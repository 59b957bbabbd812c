//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use campaign_core::GenerativeModel;
use campaign_gemini::GeminiClient;
use campaign_pipeline::AnalysisPipeline;
use campaign_render::ArtifactStore;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use crate::config::{FileConfig, Overrides, Settings};

pub mod analyze;
pub mod serve;

/// Smart Campaign Advisor - AI-assisted marketing campaign analysis
#[derive(Parser)]
#[command(name = "campaign")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML configuration file (defaults to ./campaign.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for generated images
    #[arg(long, global = true)]
    pub artifacts: Option<PathBuf>,

    /// Model identifier, e.g. gemini-pro
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web interface
    Serve(serve::ServeArgs),

    /// Run one analysis in the terminal and write the PDF report
    Analyze(analyze::AnalyzeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let file = FileConfig::discover(self.config.as_deref())?;
        let settings = Settings::resolve(
            Overrides {
                api_key: self.api_key,
                model: self.model,
                artifacts_dir: self.artifacts,
            },
            file,
        );

        match self.command {
            Commands::Serve(args) => serve::execute(args, &settings).await,
            Commands::Analyze(args) => analyze::execute(args, &settings).await,
        }
    }
}

/// Build the pipeline for the resolved settings.
///
/// A missing key is reported once here; the pipeline then refuses to run
/// analyses but everything else keeps working.
pub fn build_pipeline(settings: &Settings) -> AnalysisPipeline {
    let model: Option<Arc<dyn GenerativeModel>> = match &settings.api_key {
        Some(key) => Some(Arc::new(GeminiClient::with_base_url(key, &settings.api_base))),
        None => {
            warn!("GEMINI_API_KEY is not set; analyses are disabled");
            eprintln!(
                "{} {}",
                "!".yellow().bold(),
                "Clé API Gemini non trouvée : définissez GEMINI_API_KEY (environnement ou campaign.toml)."
                    .yellow()
            );
            None
        }
    };

    let artifacts = ArtifactStore::new(&settings.artifacts_dir);
    if let Err(e) = artifacts.ensure_logo() {
        warn!(error = %e, "Could not prepare the logo");
    }

    AnalysisPipeline::new(model, artifacts).with_options(settings.options)
}
