//! The resumable batch annotation pipeline.
//!
//! Orchestrates one run: load the dataset, drive every pending row through
//! the annotator in paced batches, fold successful results back into the
//! dataset (completion marker last), persist a snapshot, and report.

pub mod merger;
pub mod scheduler;
pub mod stats;

pub use scheduler::{BatchOutcome, BatchScheduler};

use crate::annotate::{AnnotationFields, Annotator};
use crate::config::AppConfig;
use crate::store::CsvStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// One successful annotation, addressed to its dataset row.
#[derive(Debug, Clone)]
pub struct AnnotationResult {
    pub row: usize,
    pub fields: AnnotationFields,
}

/// A row that could not be annotated in this run. Reported, never persisted.
#[derive(Debug, Clone)]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
    pub cancelled: bool,
    pub snapshot: PathBuf,
}

/// Execute one full annotation run.
///
/// Row-level failures are collected in the report; only setup and
/// persistence failures are returned as errors.
pub async fn run_pipeline(
    config: &AppConfig,
    annotator: &dyn Annotator,
    cancel: CancellationToken,
) -> Result<RunReport> {
    let store = CsvStore::new(&config.output_dir);
    let mut dataset = store
        .load(&config.input)
        .context("Failed to load input dataset")?;

    let scheduler = BatchScheduler::new(config.scheduler.clone(), cancel);
    let outcome = scheduler.run(&dataset, annotator).await;

    merger::apply(&mut dataset, &outcome.results);

    let snapshot = store
        .save(&dataset, &config.base_name)
        .context("Failed to persist annotated dataset")?;

    stats::compute(&dataset).log_summary();

    Ok(RunReport {
        processed: outcome.results.len() + outcome.errors.len(),
        succeeded: outcome.results.len(),
        failed: outcome.errors.len(),
        errors: outcome.errors,
        cancelled: outcome.cancelled,
        snapshot,
    })
}
