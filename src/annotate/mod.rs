//! Review annotation via a remote LLM endpoint.
//!
//! This module owns the contract with the model: the prompt that solicits
//! the pipe-delimited answer, the ordered output schema, and the client
//! that classifies every outcome of a model call.

pub mod client;
pub mod prompt;
pub mod schema;

pub use client::{Annotator, AnnotationError, HttpAnnotator, DEFAULT_API_URL, DEFAULT_MODEL};
pub use prompt::build_prompt;
pub use schema::{AnnotationFields, ANNOTATION_FIELDS, COMPLETION_COLUMN, FIELD_COUNT};
