//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::Settings;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "8501")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

pub async fn execute(args: ServeArgs, settings: &Settings) -> Result<()> {
    let pipeline = super::build_pipeline(settings);
    let has_model = pipeline.has_model();
    let state = campaign_web::AppState::new(pipeline, &settings.model);

    println!();
    println!(
        "  {} {}",
        "Smart Campaign".cyan().bold(),
        "Advisor".bold()
    );
    println!();
    println!(
        "  {}       http://{}:{}",
        "Page".green(),
        args.host,
        args.port
    );
    println!(
        "  {}        http://{}:{}/api/history",
        "API".green(),
        args.host,
        args.port
    );
    println!(
        "  {}      {}",
        "Model".green(),
        if has_model {
            settings.model.normal()
        } else {
            "no API key".red()
        }
    );
    println!(
        "  {}  {}",
        "Artifacts".green(),
        settings.artifacts_dir.display()
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    campaign_web::run_server(state, &args.host, args.port).await?;

    Ok(())
}
