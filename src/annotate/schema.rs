//! The annotation output schema.
//!
//! The field names and their order are a contract shared between the prompt
//! template and the response parser: the model is instructed to answer with
//! exactly one pipe-delimited value per field, in this order.

use super::client::AnnotationError;

/// Ordered output fields produced by the model for each review.
pub const ANNOTATION_FIELDS: [&str; 11] = [
    "language",
    "sentiment",
    "sentiment_score",
    "emotion",
    "emotion_intensity",
    "customer_gender",
    "main_topic",
    "keywords",
    "customer_type",
    "tourist_type",
    "group_type",
];

/// Number of fields the model must return per review.
pub const FIELD_COUNT: usize = ANNOTATION_FIELDS.len();

/// Name of the boolean column marking a row as fully annotated.
pub const COMPLETION_COLUMN: &str = "analyzed";

/// One complete set of annotation values, ordered like [`ANNOTATION_FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationFields {
    values: Vec<String>,
}

impl AnnotationFields {
    /// Build from an ordered list of values, one per schema field.
    pub fn new(values: Vec<String>) -> Result<Self, AnnotationError> {
        if values.len() != FIELD_COUNT {
            return Err(AnnotationError::SchemaMismatch {
                expected: FIELD_COUNT,
                found: values.len(),
            });
        }
        Ok(Self { values })
    }

    /// Value for a named field, if the name is part of the schema.
    pub fn get(&self, field: &str) -> Option<&str> {
        ANNOTATION_FIELDS
            .iter()
            .position(|f| *f == field)
            .map(|i| self.values[i].as_str())
    }

    /// Iterate `(field_name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        ANNOTATION_FIELDS
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_values() -> Vec<String> {
        vec![
            "en",
            "Positive",
            "0.8",
            "joy",
            "4",
            "female",
            "Customer service",
            "excellent,service,friendly",
            "Promoter",
            "Leisure tourist",
            "couple",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[test]
    fn test_new_accepts_exact_field_count() {
        let fields = AnnotationFields::new(sample_values()).unwrap();
        assert_eq!(fields.get("language"), Some("en"));
        assert_eq!(fields.get("group_type"), Some("couple"));
        assert_eq!(fields.get("not_a_field"), None);
    }

    #[test]
    fn test_new_rejects_wrong_field_count() {
        let mut values = sample_values();
        values.pop();
        let err = AnnotationFields::new(values).unwrap_err();
        assert!(matches!(
            err,
            AnnotationError::SchemaMismatch {
                expected: 11,
                found: 10
            }
        ));
    }

    #[test]
    fn test_iter_follows_schema_order() {
        let fields = AnnotationFields::new(sample_values()).unwrap();
        let names: Vec<&str> = fields.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ANNOTATION_FIELDS);
    }
}
