//! Row-oriented review dataset and its CSV persistence.
//!
//! The store owns column detection and the completion marker; everything
//! downstream addresses rows by their stable index in the dataset.

mod csv_store;
mod dataset;

pub use csv_store::CsvStore;
pub use dataset::Dataset;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or persisting a dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("input file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("could not detect required columns: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
