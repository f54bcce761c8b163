//! Post-run distribution summaries over the annotated rows.

use crate::store::Dataset;
use std::collections::HashMap;
use tracing::info;

/// Value distributions across the analyzed portion of a dataset.
#[derive(Debug)]
pub struct DatasetStats {
    pub analyzed: usize,
    pub sentiments: Vec<(String, usize)>,
    pub top_topics: Vec<(String, usize)>,
    pub top_tourist_types: Vec<(String, usize)>,
    pub emotions: Vec<(String, usize)>,
}

/// Compute distributions over rows whose completion marker is set.
pub fn compute(dataset: &Dataset) -> DatasetStats {
    DatasetStats {
        analyzed: dataset.analyzed_count(),
        sentiments: count_values(dataset, "sentiment", None),
        top_topics: count_values(dataset, "main_topic", Some(5)),
        top_tourist_types: count_values(dataset, "tourist_type", Some(3)),
        emotions: count_values(dataset, "emotion", None),
    }
}

impl DatasetStats {
    /// Emit the summary the way the run log reports everything else.
    pub fn log_summary(&self) {
        info!(analyzed = self.analyzed, "Dataset annotation totals");
        if self.analyzed == 0 {
            return;
        }
        for (value, count) in &self.sentiments {
            info!(sentiment = %value, count, "Sentiment distribution");
        }
        for (value, count) in &self.top_topics {
            info!(topic = %value, count, "Top topic");
        }
        for (value, count) in &self.top_tourist_types {
            info!(tourist_type = %value, count, "Top tourist type");
        }
        for (value, count) in &self.emotions {
            info!(emotion = %value, count, "Emotion distribution");
        }
    }
}

/// Count non-empty values of `column` across analyzed rows, most frequent
/// first (ties broken alphabetically), optionally truncated.
fn count_values(dataset: &Dataset, column: &str, limit: Option<usize>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..dataset.row_count() {
        if !dataset.is_analyzed(row) {
            continue;
        }
        match dataset.value(row, column) {
            Some(value) if !value.is_empty() => {
                *counts.entry(value.to_string()).or_default() += 1;
            }
            _ => {}
        }
    }

    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if let Some(limit) = limit {
        counts.truncate(limit);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset() -> Dataset {
        let headers = vec![
            "Review Text".to_string(),
            "Customer Name".to_string(),
            "analyzed".to_string(),
            "sentiment".to_string(),
            "main_topic".to_string(),
            "tourist_type".to_string(),
            "emotion".to_string(),
        ];
        let mk = |text: &str, analyzed: &str, sentiment: &str, topic: &str| {
            vec![
                text.to_string(),
                "x".to_string(),
                analyzed.to_string(),
                sentiment.to_string(),
                topic.to_string(),
                "Leisure tourist".to_string(),
                "joy".to_string(),
            ]
        };
        Dataset::new(
            headers,
            vec![
                mk("a", "true", "Positive", "Cleanliness"),
                mk("b", "true", "Positive", "Location"),
                mk("c", "true", "Negative", "Cleanliness"),
                mk("d", "false", "", ""),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_counts_only_analyzed_rows() {
        let stats = compute(&make_dataset());
        assert_eq!(stats.analyzed, 3);
        assert_eq!(
            stats.sentiments,
            vec![("Positive".to_string(), 2), ("Negative".to_string(), 1)]
        );
    }

    #[test]
    fn test_topics_sorted_by_count_then_name() {
        let stats = compute(&make_dataset());
        assert_eq!(
            stats.top_topics,
            vec![("Cleanliness".to_string(), 2), ("Location".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_dataset_has_no_distributions() {
        let dataset = Dataset::new(
            vec!["Review Text".to_string(), "Customer Name".to_string()],
            vec![vec!["pending".to_string(), "x".to_string()]],
        )
        .unwrap();
        let stats = compute(&dataset);
        assert_eq!(stats.analyzed, 0);
        assert!(stats.sentiments.is_empty());
    }
}
