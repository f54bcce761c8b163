//! Batch scheduling of pending rows.
//!
//! Rows are processed strictly sequentially with a pacing delay after every
//! row and a longer pause between batches, so a run stays under the
//! external API's rate limits. A cancellation signal is honored between
//! rows: the current row always completes, so merged state stays
//! consistent.

use super::{AnnotationResult, RowError};
use crate::annotate::Annotator;
use crate::config::SchedulerSettings;
use crate::store::Dataset;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Accumulated results and errors of one scheduling run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<AnnotationResult>,
    pub errors: Vec<RowError>,
    /// True when the run stopped early on a cancellation signal.
    pub cancelled: bool,
}

/// Drives pending rows through an [`Annotator`] in paced batches.
pub struct BatchScheduler {
    settings: SchedulerSettings,
    cancel: CancellationToken,
}

impl BatchScheduler {
    pub fn new(settings: SchedulerSettings, cancel: CancellationToken) -> Self {
        Self { settings, cancel }
    }

    /// Annotate every selected pending row. Does not mutate the dataset;
    /// a single row's failure never aborts the run.
    pub async fn run(&self, dataset: &Dataset, annotator: &dyn Annotator) -> BatchOutcome {
        let pending = dataset.pending_rows();
        let skipped = self.settings.start_offset.min(pending.len());
        let mut working = &pending[skipped..];
        if let Some(cap) = self.settings.max_rows {
            working = &working[..cap.min(working.len())];
        }

        info!(
            pending = pending.len(),
            selected = working.len(),
            batch_size = self.settings.batch_size,
            "Starting annotation run"
        );

        let mut outcome = BatchOutcome::default();
        if working.is_empty() {
            return outcome;
        }

        let progress_bar = ProgressBar::new(working.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=> "),
        );

        let row_delay = Duration::from_millis(self.settings.row_delay_ms);
        let batch_delay = Duration::from_millis(self.settings.batch_delay_ms);
        let batch_count = working.len().div_ceil(self.settings.batch_size);

        for (batch_no, batch) in working.chunks(self.settings.batch_size).enumerate() {
            debug!(
                batch = batch_no + 1,
                of = batch_count,
                rows = batch.len(),
                "Processing batch"
            );

            for &row in batch {
                if self.cancel.is_cancelled() {
                    warn!("Cancellation requested, stopping the run");
                    outcome.cancelled = true;
                    progress_bar.abandon();
                    return outcome;
                }

                match annotator
                    .annotate(dataset.text(row), dataset.display_name(row))
                    .await
                {
                    Ok(fields) => outcome.results.push(AnnotationResult { row, fields }),
                    Err(e) => {
                        warn!(row, error = %e, "Row annotation failed");
                        outcome.errors.push(RowError {
                            row,
                            reason: e.to_string(),
                        });
                    }
                }
                progress_bar.inc(1);

                tokio::time::sleep(row_delay).await;
            }

            if batch_no + 1 < batch_count {
                debug!("Batch complete, pausing before the next one");
                tokio::time::sleep(batch_delay).await;
            }
        }

        progress_bar.finish_and_clear();
        outcome
    }
}
