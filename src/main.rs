use anyhow::{Context, Result};
use clap::Parser;
use review_annotator::annotate::{HttpAnnotator, DEFAULT_MODEL};
use review_annotator::config::{AppConfig, CliConfig, FileConfig};
use review_annotator::pipeline::run_pipeline;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How many row errors to print in the final summary.
const ERROR_REPORT_CAP: usize = 5;

#[derive(Parser, Debug)]
#[command(version, about = "Batch LLM annotation for customer review datasets")]
struct CliArgs {
    /// Path to the CSV file with the reviews to annotate.
    pub input: PathBuf,

    /// OpenRouter API key (falls back to the OPENROUTER_API_KEY env var).
    #[clap(long)]
    pub api_key: Option<String>,

    /// Model identifier to use for annotation.
    #[clap(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Number of rows per batch.
    #[clap(long, default_value_t = 10)]
    pub batch_size: usize,

    /// Maximum number of reviews to process in this run.
    #[clap(long)]
    pub max_reviews: Option<usize>,

    /// Number of pending reviews to skip before processing.
    #[clap(long, default_value_t = 0)]
    pub start_offset: usize,

    /// Maximum attempts per review for retryable failures.
    #[clap(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Directory where output snapshots are written.
    #[clap(long)]
    pub output_dir: Option<PathBuf>,

    /// Path to a TOML config file; its values override CLI options.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[clap(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let default_level = if cli_args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "review-annotator {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        input: cli_args.input,
        api_key: cli_args.api_key,
        model: cli_args.model,
        batch_size: cli_args.batch_size,
        max_reviews: cli_args.max_reviews,
        start_offset: cli_args.start_offset,
        max_retries: cli_args.max_retries,
        output_dir: cli_args.output_dir,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupt received, stopping after the current row");
            cancel.cancel();
        })
        .context("Failed to install interrupt handler")?;
    }

    let annotator = HttpAnnotator::new(config.api_key.clone(), &config.annotator);
    info!(
        input = %config.input.display(),
        model = %annotator.model(),
        "Starting annotation run"
    );

    let report = run_pipeline(&config, &annotator, cancel).await?;

    info!(
        processed = report.processed,
        succeeded = report.succeeded,
        failed = report.failed,
        "Annotation run complete"
    );
    for error in report.errors.iter().take(ERROR_REPORT_CAP) {
        warn!(row = error.row, reason = %error.reason, "Row failed");
    }
    if report.errors.len() > ERROR_REPORT_CAP {
        warn!(
            "... and {} more row errors",
            report.errors.len() - ERROR_REPORT_CAP
        );
    }
    info!(snapshot = %report.snapshot.display(), "Results saved");
    if report.cancelled {
        warn!("Run was interrupted; completed rows were saved and will be skipped on resume");
    }

    Ok(())
}
