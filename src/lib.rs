//! Review Annotator Library
//!
//! Resumable batch annotation of customer-review datasets: each pending row
//! is sent to a remote LLM endpoint, the pipe-delimited answer is validated
//! against a fixed schema, and accepted rows are merged back atomically so
//! interrupted runs can always resume where they left off.

pub mod annotate;
pub mod config;
pub mod pipeline;
pub mod store;

// Re-export commonly used types for convenience
pub use annotate::{AnnotationError, AnnotationFields, Annotator, HttpAnnotator};
pub use config::{AppConfig, CliConfig, FileConfig};
pub use pipeline::{run_pipeline, AnnotationResult, RowError, RunReport};
pub use store::{CsvStore, Dataset, StoreError};
