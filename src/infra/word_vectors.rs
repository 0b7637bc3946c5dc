// ============================================================
// Layer 6 — Word Vector File Reader
// ============================================================
// Parses pretrained embeddings in the plain text format used by
// GloVe / fastText .vec dumps (without the header line):
//
//   the 0.418 0.24968 -0.41242 ...
//   cat 0.45281 -0.50108 -0.53714 ...
//
// Rules:
//   - first field is the word, the rest are f32 components
//   - the first vector fixes the dimension; every later line
//     must match it
//   - nan / inf components are rejected
//   - blank lines are skipped
//   - a word seen twice keeps its position, last vector wins
//
// Vectors are stored flattened, in file order, so the mean is
// always summed in the same order.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PrepError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct WordVectors {
    dim:   usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    data:  Vec<f32>,
}

impl WordVectors {
    /// Read a word-vector file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Parse from any buffered reader; `origin` is only used in errors.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let mut dim: Option<usize> = None;
        let mut words = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut data: Vec<f32> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|source| PrepError::Io {
                path: origin.to_path_buf(),
                source,
            })?;

            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else { continue };

            let coefs = fields
                .map(|f| {
                    let malformed = |reason: String| PrepError::MalformedVector {
                        path: origin.to_path_buf(),
                        line: line_no,
                        reason,
                    };
                    let x = f
                        .parse::<f32>()
                        .map_err(|e| malformed(format!("component '{f}' is not a number ({e})")))?;
                    if x.is_finite() {
                        Ok(x)
                    } else {
                        Err(malformed(format!("non-finite component '{f}'")))
                    }
                })
                .collect::<Result<Vec<f32>>>()?;

            if coefs.is_empty() {
                return Err(PrepError::MalformedVector {
                    path:   origin.to_path_buf(),
                    line:   line_no,
                    reason: format!("word '{word}' has no vector components"),
                });
            }

            let expected = *dim.get_or_insert(coefs.len());
            if coefs.len() != expected {
                return Err(PrepError::DimensionMismatch {
                    path:  origin.to_path_buf(),
                    line:  line_no,
                    expected,
                    found: coefs.len(),
                });
            }

            match index.get(word) {
                Some(&slot) => {
                    data[slot * expected..(slot + 1) * expected].copy_from_slice(&coefs);
                }
                None => {
                    index.insert(word.to_string(), words.len());
                    words.push(word.to_string());
                    data.extend_from_slice(&coefs);
                }
            }
        }

        match dim {
            Some(dim) => Ok(Self { dim, words, index, data }),
            None => Err(PrepError::EmptyVectorFile { path: origin.to_path_buf() }),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index
            .get(word)
            .map(|&slot| &self.data[slot * self.dim..(slot + 1) * self.dim])
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Elementwise mean over all distinct words.
    pub fn mean_vector(&self) -> Vec<f32> {
        let mut sum = vec![0f64; self.dim];
        for row in self.data.chunks_exact(self.dim) {
            for (acc, &x) in sum.iter_mut().zip(row) {
                *acc += f64::from(x);
            }
        }
        let n = self.words.len() as f64;
        sum.into_iter().map(|s| (s / n) as f32).collect()
    }
}
