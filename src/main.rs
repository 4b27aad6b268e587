use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillbridge::catalog::Catalog;
use skillbridge::config::Config;
use skillbridge::llm::GeminiClient;
use skillbridge::pipeline::{analyze, render_text_report};

/// Analyze a resume against a catalog job role.
#[derive(Debug, Parser)]
#[command(name = "skillbridge", version)]
struct Cli {
    /// Resume document: PDF, DOCX, or image (JPG/PNG/WEBP)
    resume: PathBuf,

    /// Target role name, e.g. "Frontend Developer"
    #[arg(long)]
    role: String,

    /// Optional job description text file
    #[arg(long)]
    jd: Option<PathBuf>,

    /// Write a short plain-text report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting SkillBridge v{} ({} API keys discovered)",
        env!("CARGO_PKG_VERSION"),
        config.api_keys.len()
    );

    let catalog = Catalog::builtin()?;
    let llm = GeminiClient::new(config.api_keys.clone());

    let filename = cli
        .resume
        .file_name()
        .and_then(|n| n.to_str())
        .context("Resume path has no valid filename")?
        .to_string();
    let bytes = std::fs::read(&cli.resume)
        .with_context(|| format!("Failed to read '{}'", cli.resume.display()))?;

    let jd_text = match &cli.jd {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read JD '{}'", path.display()))?,
        ),
        None => None,
    };

    let report = analyze(
        &bytes,
        &filename,
        &cli.role,
        jd_text.as_deref(),
        &catalog,
        &llm,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = &cli.report {
        std::fs::write(path, render_text_report(&report))
            .with_context(|| format!("Failed to write report '{}'", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
