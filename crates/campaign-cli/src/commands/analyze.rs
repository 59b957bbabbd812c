//! One-shot analysis in the terminal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use campaign_core::campaign::model::BUDGET_DEFAULT;
use campaign_core::campaign::{
    AnalysisRequest, Audience, CampaignDuration, Goal, Language, PipelineFlags, Sector, Style,
};
use campaign_core::{Notice, Session, StageOutcome};
use campaign_render::{report_text, ReportExporter};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Settings;
use crate::output;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Sector label, e.g. "Mode" or "Autre"
    #[arg(long, default_value = "Général")]
    pub sector: String,

    /// Free-text sector, required with "Autre"
    #[arg(long, default_value = "")]
    pub domain: String,

    /// Budget in euros
    #[arg(long, default_value_t = BUDGET_DEFAULT)]
    pub budget: u32,

    /// Audience bracket: "18-24 ans", "25-34 ans", "35-44 ans" or "45+ ans"
    #[arg(long, default_value = "25-34 ans")]
    pub audience: String,

    /// Duration in days: 7, 14, 30, 60 or 90
    #[arg(long, default_value_t = 30)]
    pub duration: u32,

    /// Objective: Acquisition, Conversion, Rétention or Notoriété
    #[arg(long, default_value = "Acquisition")]
    pub goal: String,

    /// Answer style: Formel, Dynamique or Humour
    #[arg(long, default_value = "Formel")]
    pub style: String,

    /// Answer language: Français or Anglais
    #[arg(long, default_value = "Français")]
    pub language: String,

    /// PDF path (defaults to rapport_<sector>.pdf)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the premium insights
    #[arg(long)]
    pub no_premium: bool,

    /// Skip the advertising visual
    #[arg(long)]
    pub no_visual: bool,

    /// Skip the summary banner
    #[arg(long)]
    pub no_summary: bool,
}

impl AnalyzeArgs {
    fn to_request(&self, model: &str) -> Result<AnalysisRequest> {
        fn parse<T>(value: Option<T>, what: &str, raw: &str) -> Result<T> {
            value.ok_or_else(|| anyhow!("Unknown {}: {}", what, raw))
        }

        Ok(AnalysisRequest {
            sector: parse(Sector::from_label(&self.sector), "sector", &self.sector)?,
            custom_domain: self.domain.clone(),
            budget: self.budget,
            audience: parse(Audience::from_label(&self.audience), "audience", &self.audience)?,
            duration: CampaignDuration::try_from(self.duration)?,
            goal: parse(Goal::from_label(&self.goal), "goal", &self.goal)?,
            style: parse(Style::from_label(&self.style), "style", &self.style)?,
            language: parse(Language::from_label(&self.language), "language", &self.language)?,
            model: model.to_string(),
            report_filename: self
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            flags: PipelineFlags {
                generate_premium_insights: !self.no_premium,
                generate_visual_asset: !self.no_visual,
                generate_summary_banner: !self.no_summary,
            },
        })
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Write the report; a failure becomes a user-facing outcome.
fn save_report(exporter: &ReportExporter, text: &str, path: &Path) -> StageOutcome<()> {
    match exporter.export_to(text, path) {
        Ok(()) => {
            info!(path = %path.display(), "Report written");
            StageOutcome::Success(())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Report not written");
            StageOutcome::failed(format!("Erreur lors de la création du PDF : {}", e))
        }
    }
}

pub async fn execute(args: AnalyzeArgs, settings: &Settings) -> Result<()> {
    let request = args.to_request(&settings.model)?;
    let pipeline = super::build_pipeline(settings);
    let mut session = Session::new();

    let pb = spinner("Analyse de la campagne en cours...");
    let report = pipeline.run(&mut session, &request).await;
    pb.finish_and_clear();

    for notice in &report.notices {
        output::print_notice(notice);
    }

    let Some(result) = session.last() else {
        bail!("Analysis did not complete");
    };
    output::print_result(result);

    let path = PathBuf::from(&result.report_filename);
    let mut exporter = ReportExporter::new();
    if let Some(logo) = pipeline.artifacts().load_logo() {
        exporter = exporter.with_logo(logo);
    }
    match save_report(&exporter, &report_text(result), &path) {
        StageOutcome::Success(()) => {
            println!();
            println!("{} {}", "Rapport PDF".green().bold(), path.display());
        }
        StageOutcome::Degraded { warning } => output::print_notice(&Notice::warning(warning)),
        StageOutcome::Failed { error } => output::print_notice(&Notice::error(error)),
    }

    println!();
    output::print_history(&session);

    Ok(())
}
