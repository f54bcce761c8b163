//! Shared fixtures for pipeline integration tests.

use async_trait::async_trait;
use review_annotator::annotate::{AnnotationError, AnnotationFields, Annotator, FIELD_COUNT};
use review_annotator::config::{AnnotatorSettings, AppConfig, SchedulerSettings};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Write a CSV input file with the standard review/name columns and a BOM,
/// the way spreadsheet exports arrive.
pub fn write_reviews_csv(path: &Path, rows: &[(&str, &str)]) {
    let mut content = String::from("\u{feff}Review Text,Customer Name\n");
    for (text, name) in rows {
        content.push_str(&format!("{},{}\n", text, name));
    }
    std::fs::write(path, content).unwrap();
}

/// App config pointing at temp locations, with pacing delays zeroed so
/// tests run instantly.
pub fn test_config(input: PathBuf, output_dir: PathBuf) -> AppConfig {
    AppConfig {
        input,
        api_key: "sk-test".to_string(),
        output_dir,
        base_name: "reviews_annotated".to_string(),
        annotator: AnnotatorSettings::default(),
        scheduler: SchedulerSettings {
            row_delay_ms: 0,
            batch_delay_ms: 0,
            ..Default::default()
        },
    }
}

/// A full set of plausible annotation values.
pub fn good_fields() -> AnnotationFields {
    AnnotationFields::new(
        vec![
            "en",
            "Positive",
            "0.7",
            "joy",
            "4",
            "female",
            "Customer service",
            "great,helpful,clean",
            "Promoter",
            "Leisure tourist",
            "couple",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    )
    .unwrap()
}

/// Annotator double that answers with [`good_fields`] unless the review
/// text is scripted to fail with a malformed (9-field) response.
pub struct ScriptedAnnotator {
    failing: HashSet<String>,
}

impl ScriptedAnnotator {
    pub fn succeeding() -> Self {
        Self {
            failing: HashSet::new(),
        }
    }

    pub fn failing_on(texts: &[&str]) -> Self {
        Self {
            failing: texts.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Annotator for ScriptedAnnotator {
    async fn annotate(
        &self,
        review_text: &str,
        _customer_name: &str,
    ) -> Result<AnnotationFields, AnnotationError> {
        if self.failing.contains(review_text) {
            return Err(AnnotationError::SchemaMismatch {
                expected: FIELD_COUNT,
                found: 9,
            });
        }
        Ok(good_fields())
    }
}
