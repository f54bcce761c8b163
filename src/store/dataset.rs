//! In-memory tabular dataset of review rows.

use super::StoreError;
use crate::annotate::COMPLETION_COLUMN;
use tracing::debug;

/// An ordered collection of rows sharing a uniform column set.
///
/// Row indices are stable for the lifetime of the dataset: rows are only
/// dropped at construction time (empty review text), never afterwards, so
/// annotation results can safely address rows by index.
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    text_col: usize,
    name_col: usize,
    analyzed_col: usize,
}

impl Dataset {
    /// Build a dataset from raw headers and records.
    ///
    /// Detects the review-text and customer-name columns, drops rows with
    /// an empty text cell, and attaches the completion marker column when
    /// it is missing.
    pub(crate) fn new(mut headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, StoreError> {
        let text_col = detect_column(&headers, &["review", "text"], "text").ok_or_else(|| {
            StoreError::Schema(format!("no review text column among {:?}", headers))
        })?;
        let name_col = detect_column(&headers, &["customer", "name"], "name").ok_or_else(|| {
            StoreError::Schema(format!("no customer name column among {:?}", headers))
        })?;

        debug!(
            text_column = %headers[text_col],
            name_column = %headers[name_col],
            "Detected dataset columns"
        );

        let mut rows: Vec<Vec<String>> = rows
            .into_iter()
            .filter(|row| !row[text_col].trim().is_empty())
            .collect();

        let analyzed_col = match headers.iter().position(|h| h == COMPLETION_COLUMN) {
            Some(col) => col,
            None => {
                headers.push(COMPLETION_COLUMN.to_string());
                for row in &mut rows {
                    row.push("false".to_string());
                }
                headers.len() - 1
            }
        };

        Ok(Self {
            headers,
            rows,
            text_col,
            name_col,
            analyzed_col,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Name of the detected review-text column.
    pub fn text_column(&self) -> &str {
        &self.headers[self.text_col]
    }

    /// Name of the detected customer-name column.
    pub fn name_column(&self) -> &str {
        &self.headers[self.name_col]
    }

    pub fn text(&self, row: usize) -> &str {
        &self.rows[row][self.text_col]
    }

    pub fn display_name(&self, row: usize) -> &str {
        &self.rows[row][self.name_col]
    }

    pub fn is_analyzed(&self, row: usize) -> bool {
        parse_flag(&self.rows[row][self.analyzed_col])
    }

    /// Indices of rows still awaiting annotation, in dataset order.
    pub fn pending_rows(&self) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&row| !self.is_analyzed(row))
            .collect()
    }

    pub fn analyzed_count(&self) -> usize {
        (0..self.rows.len())
            .filter(|&row| self.is_analyzed(row))
            .count()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value for a named column, if the column exists.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        self.column_index(column)
            .map(|col| self.rows[row][col].as_str())
    }

    /// Index of the named column, appending an empty one when missing.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        match self.column_index(name) {
            Some(col) => col,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        }
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: String) {
        self.rows[row][col] = value;
    }

    /// Flip the completion marker for a row. Callers must have written all
    /// annotation cells first.
    pub fn mark_analyzed(&mut self, row: usize) {
        self.rows[row][self.analyzed_col] = "true".to_string();
    }

    /// Iterate raw records for persistence.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// First header containing every required fragment (case-insensitive),
/// falling back to the first containing `fallback`.
fn detect_column(headers: &[String], required: &[&str], fallback: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| {
            let h = h.to_lowercase();
            required.iter().all(|fragment| h.contains(fragment))
        })
        .or_else(|| {
            headers
                .iter()
                .position(|h| h.to_lowercase().contains(fallback))
        })
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}
