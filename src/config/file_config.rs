use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub output_dir: Option<String>,
    pub base_name: Option<String>,

    // Feature configs
    pub pipeline: Option<PipelineConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub batch_size: Option<usize>,
    pub max_reviews: Option<usize>,
    pub start_offset: Option<usize>,
    pub max_retries: Option<u32>,
    pub row_delay_ms: Option<u64>,
    pub batch_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
