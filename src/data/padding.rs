// ============================================================
// Layer 4 — Sequence Padding
// ============================================================
// Every row must reach the model as exactly `maxlen` ids.
//
//   longer than maxlen   → keep the LAST maxlen ids
//                          (the earliest tokens are dropped)
//   shorter than maxlen  → fill with pad_idx, then copy the ids
//                          to the tail (pad_first = true)
//                          or to the head (pad_first = false)
//
// Example with maxlen = 5, pad_idx = 1:
//   [7, 8, 9]           pad_first  → [1, 1, 7, 8, 9]
//   [7, 8, 9]           !pad_first → [7, 8, 9, 1, 1]
//   [2, 3, 4, 5, 6, 7]             → [3, 4, 5, 6, 7]
//   []                             → [1, 1, 1, 1, 1]

use ndarray::{s, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::domain::vocab::PAD_ID;
use crate::error::{PrepError, Result};

/// How to bring a sequence to a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadOptions {
    pub maxlen:    usize,
    pub pad_first: bool,
    pub pad_idx:   i32,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            maxlen:    190,
            pad_first: true,
            pad_idx:   PAD_ID as i32,
        }
    }
}

impl PadOptions {
    pub fn new(maxlen: usize) -> Self {
        Self { maxlen, ..Self::default() }
    }
}

fn to_i32(ids: &[usize]) -> Result<Vec<i32>> {
    ids.iter()
        .map(|&id| i32::try_from(id).map_err(|_| PrepError::IdOverflow(id)))
        .collect()
}

/// Truncate or pad one id sequence to `opts.maxlen`.
pub fn pad_sequences(seq: &[usize], opts: &PadOptions) -> Result<Array1<i32>> {
    let maxlen = opts.maxlen;

    if seq.len() >= maxlen {
        let tail = to_i32(&seq[seq.len() - maxlen..])?;
        return Ok(Array1::from(tail));
    }

    let ids = to_i32(seq)?;
    let n   = ids.len();
    let mut res = Array1::from_elem(maxlen, opts.pad_idx);
    let src = ArrayView1::from(&ids[..]);
    if opts.pad_first {
        res.slice_mut(s![maxlen - n..]).assign(&src);
    } else {
        res.slice_mut(s![..n]).assign(&src);
    }
    Ok(res)
}

/// Pad every row; the result has shape `(seqs.len(), maxlen)`.
pub fn pad_all(seqs: &[Vec<usize>], opts: &PadOptions) -> Result<Array2<i32>> {
    let mut out = Array2::from_elem((seqs.len(), opts.maxlen), opts.pad_idx);
    for (i, seq) in seqs.iter().enumerate() {
        out.row_mut(i).assign(&pad_sequences(seq, opts)?);
    }
    Ok(out)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn opts(maxlen: usize, pad_first: bool) -> PadOptions {
        PadOptions { maxlen, pad_first, pad_idx: 1 }
    }

    #[test]
    fn test_long_sequence_keeps_last_elements() {
        let out = pad_sequences(&[2, 3, 4, 5, 6, 7], &opts(5, true)).unwrap();
        assert_eq!(out, array![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_exact_length_unchanged() {
        let out = pad_sequences(&[9, 8, 7], &opts(3, false)).unwrap();
        assert_eq!(out, array![9, 8, 7]);
    }

    #[test]
    fn test_pad_first_fills_head() {
        let out = pad_sequences(&[7, 8, 9], &opts(5, true)).unwrap();
        assert_eq!(out, array![1, 1, 7, 8, 9]);
    }

    #[test]
    fn test_pad_last_fills_tail() {
        let out = pad_sequences(&[7, 8, 9], &opts(5, false)).unwrap();
        assert_eq!(out, array![7, 8, 9, 1, 1]);
    }

    #[test]
    fn test_empty_sequence_is_all_pad() {
        let out = pad_sequences(&[], &opts(5, true)).unwrap();
        assert_eq!(out, array![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_custom_pad_idx() {
        let o = PadOptions { maxlen: 4, pad_first: true, pad_idx: 0 };
        assert_eq!(pad_sequences(&[5], &o).unwrap(), array![0, 0, 0, 5]);
    }

    #[test]
    fn test_zero_maxlen_gives_empty() {
        let out = pad_sequences(&[1, 2, 3], &opts(0, true)).unwrap();
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn test_defaults() {
        let o = PadOptions::default();
        assert_eq!((o.maxlen, o.pad_first, o.pad_idx), (190, true, 1));
        assert_eq!(pad_sequences(&[4], &o).unwrap().len(), 190);
    }

    #[test]
    fn test_id_overflow_rejected() {
        let big = i32::MAX as usize + 1;
        let err = pad_sequences(&[big], &opts(3, true)).unwrap_err();
        assert!(matches!(err, PrepError::IdOverflow(id) if id == big));
    }

    #[test]
    fn test_overflow_in_truncated_prefix_is_ignored() {
        let big = i32::MAX as usize + 1;
        let out = pad_sequences(&[big, 2, 3], &opts(2, true)).unwrap();
        assert_eq!(out, array![2, 3]);
    }

    #[test]
    fn test_length_always_maxlen() {
        for len in 0..12usize {
            let seq: Vec<usize> = (10..10 + len).collect();
            for pad_first in [true, false] {
                let out = pad_sequences(&seq, &opts(7, pad_first)).unwrap();
                assert_eq!(out.len(), 7);
            }
        }
    }

    #[test]
    fn test_pad_all_shape() {
        let seqs = vec![vec![4, 5], vec![], vec![6, 7, 8, 9]];
        let out = pad_all(&seqs, &opts(3, true)).unwrap();
        assert_eq!(out.dim(), (3, 3));
        assert_eq!(out, array![[1, 4, 5], [1, 1, 1], [7, 8, 9]]);
    }

    #[test]
    fn test_pad_all_no_rows() {
        let out = pad_all(&[], &opts(4, true)).unwrap();
        assert_eq!(out.dim(), (0, 4));
    }
}
