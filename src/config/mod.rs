mod file_config;

pub use file_config::{FileConfig, PipelineConfig};

use crate::annotate::{DEFAULT_API_URL, DEFAULT_MODEL};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Environment variable consulted for the API credential when `--api-key`
/// is not given.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub batch_size: usize,
    pub max_reviews: Option<usize>,
    pub start_offset: usize,
    pub max_retries: u32,
    pub output_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            batch_size: 10,
            max_reviews: None,
            start_offset: 0,
            max_retries: 3,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub input: PathBuf,
    pub api_key: String,
    pub output_dir: PathBuf,
    pub base_name: String,

    // Feature configs (with defaults)
    pub annotator: AnnotatorSettings,
    pub scheduler: SchedulerSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present; the API credential
    /// falls back to the `OPENROUTER_API_KEY` environment variable.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        Self::resolve_inner(cli, file_config, env_key)
    }

    fn resolve_inner(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        env_api_key: Option<String>,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_key = cli
            .api_key
            .clone()
            .or(env_api_key)
            .filter(|k| !k.trim().is_empty());
        let Some(api_key) = api_key else {
            bail!(
                "API key not found: pass --api-key or set the {} environment variable",
                API_KEY_ENV
            );
        };

        if !cli.input.exists() {
            bail!("Input file does not exist: {:?}", cli.input);
        }

        let output_dir = file
            .output_dir
            .map(PathBuf::from)
            .or_else(|| cli.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let base_name = file
            .base_name
            .unwrap_or_else(|| "reviews_annotated".to_string());

        // Pipeline settings - merge file config with CLI and defaults
        let pl = file.pipeline.unwrap_or_default();
        let defaults = SchedulerSettings::default();

        let scheduler = SchedulerSettings {
            batch_size: pl.batch_size.unwrap_or(cli.batch_size),
            max_rows: pl.max_reviews.or(cli.max_reviews),
            start_offset: pl.start_offset.unwrap_or(cli.start_offset),
            row_delay_ms: pl.row_delay_ms.unwrap_or(defaults.row_delay_ms),
            batch_delay_ms: pl.batch_delay_ms.unwrap_or(defaults.batch_delay_ms),
        };

        if scheduler.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }

        let annotator_defaults = AnnotatorSettings::default();
        let annotator = AnnotatorSettings {
            api_url: file.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: file.model.unwrap_or_else(|| cli.model.clone()),
            max_retries: pl.max_retries.unwrap_or(cli.max_retries),
            request_timeout_secs: pl
                .request_timeout_secs
                .unwrap_or(annotator_defaults.request_timeout_secs),
            temperature: pl.temperature.unwrap_or(annotator_defaults.temperature),
            max_tokens: pl.max_tokens.unwrap_or(annotator_defaults.max_tokens),
        };

        if annotator.max_retries == 0 {
            bail!("max_retries must be at least 1");
        }

        Ok(Self {
            input: cli.input.clone(),
            api_key,
            output_dir,
            base_name,
            annotator,
            scheduler,
        })
    }
}

/// Settings for the HTTP annotation client.
#[derive(Debug, Clone)]
pub struct AnnotatorSettings {
    pub api_url: String,
    pub model: String,
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AnnotatorSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: 3,
            request_timeout_secs: 30,
            temperature: 0.1,
            max_tokens: 500,
        }
    }
}

/// Settings for the batch scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub batch_size: usize,
    pub max_rows: Option<usize>,
    pub start_offset: usize,
    pub row_delay_ms: u64,
    pub batch_delay_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_rows: None,
            start_offset: 0,
            row_delay_ms: 500,
            batch_delay_ms: 2000,
        }
    }
}
