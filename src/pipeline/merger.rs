//! Folds annotation results back into the dataset.

use super::AnnotationResult;
use crate::store::Dataset;

/// Apply successful results to the dataset, row by row.
///
/// For each result every annotation cell is written before the completion
/// marker is set: an interrupted run leaves a row either fully annotated
/// and marked, or untouched and pending. Failed rows are never inspected
/// here; they stay pending for the next run.
pub fn apply(dataset: &mut Dataset, results: &[AnnotationResult]) {
    for result in results {
        for (field, value) in result.fields.iter() {
            let col = dataset.ensure_column(field);
            dataset.set_value(result.row, col, value.to_string());
        }
        dataset.mark_analyzed(result.row);
    }
}
