//! CSV adapter for review datasets.
//!
//! Input files are UTF-8 with an optional BOM (spreadsheet exports);
//! snapshots are written with a BOM so they round-trip through the same
//! tools. Saving never touches the caller's input file: every run produces
//! a timestamped snapshot plus a fixed `latest` alias.

use super::dataset::Dataset;
use super::StoreError;
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Loads and persists datasets as CSV files.
pub struct CsvStore {
    output_dir: PathBuf,
}

impl CsvStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Load a dataset from `path`.
    pub fn load(&self, path: &Path) -> Result<Dataset, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let raw = fs::read(path)?;
        let data = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

        let mut reader = csv::Reader::from_reader(data);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let total = rows.len();
        let dataset = Dataset::new(headers, rows)?;
        info!(
            path = %path.display(),
            loaded = total,
            kept = dataset.row_count(),
            dropped = total - dataset.row_count(),
            pending = dataset.pending_rows().len(),
            "Loaded review dataset"
        );
        Ok(dataset)
    }

    /// Write a timestamped snapshot and the `latest` alias; returns the
    /// snapshot path.
    pub fn save(&self, dataset: &Dataset, base_name: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.output_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let snapshot = self
            .output_dir
            .join(format!("{}_{}.csv", base_name, timestamp));
        let latest = self.output_dir.join(format!("{}_latest.csv", base_name));

        write_csv(&snapshot, dataset)?;
        write_csv(&latest, dataset)?;

        info!(
            snapshot = %snapshot.display(),
            latest = %latest.display(),
            "Saved dataset"
        );
        Ok(snapshot)
    }
}

fn write_csv(path: &Path, dataset: &Dataset) -> Result<(), StoreError> {
    let mut file = fs::File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(dataset.headers())?;
    for row in dataset.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\u{feff}Review Text, Customer Name\nGreat stay,Alice\n,Bob\nAwful food,Carol\n";

    fn write_input(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("reviews.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let result = store.load(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_load_strips_bom_and_trims_headers() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let dataset = store.load(&write_input(&dir, SAMPLE)).unwrap();

        assert_eq!(dataset.text_column(), "Review Text");
        assert_eq!(dataset.name_column(), "Customer Name");
    }

    #[test]
    fn test_load_drops_blank_text_rows_and_adds_marker() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let dataset = store.load(&write_input(&dir, SAMPLE)).unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.pending_rows(), vec![0, 1]);
        assert_eq!(dataset.display_name(1), "Carol");
    }

    #[test]
    fn test_save_writes_snapshot_and_latest_with_bom() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("out"));
        let dataset = store.load(&write_input(&dir, SAMPLE)).unwrap();

        let snapshot = store.save(&dataset, "reviews_annotated").unwrap();
        let latest = dir.path().join("out").join("reviews_annotated_latest.csv");

        assert!(snapshot.exists());
        assert!(latest.exists());
        assert!(snapshot
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("reviews_annotated_"));

        let bytes = fs::read(&latest).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
    }

    #[test]
    fn test_round_trip_preserves_rows_and_marker() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let mut dataset = store.load(&write_input(&dir, SAMPLE)).unwrap();

        let col = dataset.ensure_column("sentiment");
        dataset.set_value(0, col, "Positive".to_string());
        dataset.mark_analyzed(0);
        store.save(&dataset, "reviews_annotated").unwrap();

        let reloaded = store
            .load(&dir.path().join("reviews_annotated_latest.csv"))
            .unwrap();
        assert_eq!(reloaded.row_count(), 2);
        assert_eq!(reloaded.text(0), "Great stay");
        assert_eq!(reloaded.value(0, "sentiment"), Some("Positive"));
        assert!(reloaded.is_analyzed(0));
        assert!(!reloaded.is_analyzed(1));
        assert_eq!(reloaded.pending_rows(), vec![1]);
    }

    #[test]
    fn test_load_undetectable_schema() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let path = write_input(&dir, "Description,Label\nx,y\n");
        assert!(matches!(store.load(&path), Err(StoreError::Schema(_))));
    }
}
