mod analysis;
mod config;
mod errors;
mod formatting;
mod generation;
mod llm_client;
mod models;
mod output;
mod sources;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{SignalAnalyzer, SignalPayload};
use crate::config::Config;
use crate::errors::AppError;
use crate::formatting::{remove_links, validate_and_autofix_sections, validate_output_quality};
use crate::generation::{AgentPipelineWriter, OfflineWriter, SectionWriter};
use crate::llm_client::LlmClient;
use crate::output::OutputWriter;

/// Turns a repository's history into evidence-backed CV sections.
#[derive(Debug, Parser)]
#[command(name = "cvsmith", version, about)]
struct Cli {
    /// YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Repository to analyse.
    #[arg(long, env = "REPO_PATH", default_value = ".")]
    repo: PathBuf,

    /// Directory for signals.json, bullets.md and quality.json.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Skip the LLM pipeline even when an API key is configured.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvsmith v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    info!(
        "Analysing contributions of {} ({})",
        config.you.full_name, config.you.role
    );

    let repo = cli
        .repo
        .canonicalize()
        .with_context(|| format!("Repository path not found: {}", cli.repo.display()))?;

    if let Err(e) = run(&cli, &config, &repo).await {
        error!("Run failed: {e}");
        return Err(e.into());
    }
    Ok(())
}

async fn run(cli: &Cli, config: &Config, repo: &Path) -> Result<(), AppError> {
    let out = OutputWriter::new(&cli.output_dir);

    let payload = SignalAnalyzer::new(config).run(repo).await?;
    out.write_signals(&payload).await?;

    let raw = write_sections(cli, config, &payload).await?;

    let fixed = validate_and_autofix_sections(&remove_links(&raw));
    let report = validate_output_quality(&fixed);
    info!(
        "Quality: {} sections, average {:.2} ({} high / {} medium / {} low)",
        report.section_count,
        report.average_quality,
        report.quality_distribution.high,
        report.quality_distribution.medium,
        report.quality_distribution.low
    );
    for issue in &report.issues {
        warn!("Quality issue: {issue}");
    }

    out.write_bullets(&fixed).await?;
    out.write_quality(&report).await?;

    info!("Done");
    Ok(())
}

/// Runs the LLM pipeline when possible and falls back to the offline writer
/// on any failure.
async fn write_sections(
    cli: &Cli,
    config: &Config,
    payload: &SignalPayload,
) -> Result<String, AppError> {
    let offline = OfflineWriter::new(config.output.bullets_count);

    let api_key = match (&config.env.anthropic_api_key, cli.offline) {
        (Some(key), false) => key.clone(),
        (None, false) => {
            info!("ANTHROPIC_API_KEY not set, using offline writer");
            return offline.write_sections(payload).await;
        }
        (_, true) => {
            info!("Offline mode requested");
            return offline.write_sections(payload).await;
        }
    };

    let pipeline = AgentPipelineWriter::new(
        LlmClient::new(api_key)?,
        config.you.full_name.clone(),
        config.output.bullets_count,
        config.output.style.clone(),
    );
    info!(
        "Writing sections with {} (model: {})",
        pipeline.name(),
        llm_client::MODEL
    );

    match pipeline.write_sections(payload).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("{} failed: {e}; falling back to {}", pipeline.name(), offline.name());
            offline.write_sections(payload).await
        }
    }
}
