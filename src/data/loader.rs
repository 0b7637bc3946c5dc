// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads a headered CSV file into a TextFrame using the csv crate.
//
//   header row  → column names
//   every other → one value per column, kept as raw strings
//
// Records with a different number of fields than the header
// are a csv::Error, not silently padded.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::data::frame::TextFrame;
use crate::error::{PrepError, Result};

pub struct CsvLoader {
    path:      PathBuf,
    delimiter: u8,
}

impl CsvLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path:      path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// Use a different field separator, e.g. `b'\t'` for TSV.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn load(&self) -> Result<TextFrame> {
        let file = File::open(&self.path).map_err(|source| PrepError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(file);

        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut columns: Vec<Vec<String>> = vec![Vec::new(); names.len()];

        for record in reader.records() {
            let record = record?;
            for (col, value) in columns.iter_mut().zip(record.iter()) {
                col.push(value.to_string());
            }
        }

        tracing::debug!(
            "Loaded {} rows x {} columns from '{}'",
            columns.first().map(Vec::len).unwrap_or(0),
            names.len(),
            self.path.display()
        );

        TextFrame::from_columns(names.into_iter().zip(columns))
    }
}

impl TextFrame {
    /// Load a comma-separated file with a header row.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        CsvLoader::new(path).load()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::TextSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tmp(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_loads_named_columns() {
        let f = write_tmp("id,review\n1,\"Great movie, loved it\"\n2,Awful\n");
        let frame = TextFrame::from_csv(f.path()).unwrap();
        assert_eq!(frame.num_rows(), 2);
        assert_eq!(
            frame.column("review").unwrap(),
            vec!["Great movie, loved it".to_string(), "Awful".to_string()]
        );
    }

    #[test]
    fn test_tab_delimiter() {
        let f = write_tmp("a\tb\nx\ty\n");
        let frame = CsvLoader::new(f.path()).with_delimiter(b'\t').load().unwrap();
        assert_eq!(frame.column("b").unwrap(), vec!["y".to_string()]);
    }

    #[test]
    fn test_header_only_gives_zero_rows() {
        let f = write_tmp("text\n");
        let frame = TextFrame::from_csv(f.path()).unwrap();
        assert_eq!(frame.num_rows(), 0);
        assert!(frame.column("text").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TextFrame::from_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, PrepError::Io { .. }));
    }

    #[test]
    fn test_ragged_record_is_csv_error() {
        let f = write_tmp("a,b\n1,2\n3\n");
        let err = TextFrame::from_csv(f.path()).unwrap_err();
        assert!(matches!(err, PrepError::Csv(_)));
    }
}
