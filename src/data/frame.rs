// ============================================================
// Layer 4 — Text Frame
// ============================================================
// Minimal column-addressable table of strings. Columns keep
// their insertion order and all have the same number of rows.
//
//   TextFrame
//     └── columns: Vec<(name, Vec<String>)>
//
// Implements TextSource so prepare_text can read one named
// column from it.

use crate::domain::traits::TextSource;
use crate::error::{PrepError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    columns: Vec<(String, Vec<String>)>,
}

impl TextFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from `(name, rows)` pairs. All columns must have
    /// the same length.
    pub fn from_columns<I, N>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Vec<String>)>,
        N: Into<String>,
    {
        let mut frame = Self::new();
        for (name, rows) in columns {
            frame.push_column(name, rows)?;
        }
        Ok(frame)
    }

    /// Append a column, or replace an existing one with the same name.
    pub fn push_column(&mut self, name: impl Into<String>, rows: Vec<String>) -> Result<()> {
        let name = name.into();
        let replacing = self.columns.iter().position(|(n, _)| *n == name);

        let others_len = self
            .columns
            .iter()
            .enumerate()
            .find(|(i, _)| Some(*i) != replacing)
            .map(|(_, (_, r))| r.len());
        if let Some(expected) = others_len {
            if rows.len() != expected {
                return Err(PrepError::RaggedColumn { name, expected, found: rows.len() });
            }
        }

        match replacing {
            Some(i) => self.columns[i].1 = rows,
            None    => self.columns.push((name, rows)),
        }
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|(_, r)| r.len()).unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Borrow a column without copying it.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r.as_slice())
    }
}

impl TextSource for TextFrame {
    fn column(&self, name: &str) -> Result<Vec<String>> {
        self.get(name)
            .map(<[String]>::to_vec)
            .ok_or_else(|| PrepError::MissingColumn(name.to_string()))
    }
}
