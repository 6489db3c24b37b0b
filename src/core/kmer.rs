//! Fixed-length window ("k-mer") generation over sequences.
//!
//! A sequence of length `L` yields `max(0, L - k + 1)` k-mers with 1-based
//! start positions forming the contiguous range `1..=L - k + 1`. Sequences
//! shorter than `k` contribute no k-mers; that is not an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::sequence::Sequence;
use crate::utils::validation::check_k;

#[derive(Error, Debug)]
pub enum KmerError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// A fixed-length window of a sequence.
///
/// Invariants: `text.len() == k` and `end == start + k - 1` (1-based,
/// inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KMer {
    /// Name of the sequence this window was cut from
    pub source_name: String,

    /// Total length of the source sequence
    pub source_length: usize,

    /// 1-based start position of the window
    pub start: usize,

    /// 1-based inclusive end position (`start + k - 1`)
    pub end: usize,

    /// The window itself
    pub text: String,

    /// Window length
    pub k: usize,
}

/// Iterate the k-mers of one sequence without allocating records.
///
/// Yields `(start, window)` with a 1-based start and a borrowed window slice.
/// Callers that need owned [`KMer`] records should use [`generate`] instead.
pub fn windows(seq: &Sequence, k: usize) -> impl Iterator<Item = (usize, &str)> {
    let residues = seq.residues.as_str();
    let count = if k >= 1 && residues.len() >= k {
        residues.len() - k + 1
    } else {
        0
    };
    (0..count).map(move |i| (i + 1, &residues[i..i + k]))
}

/// Generate the k-mer records of a set of sequences.
///
/// # Errors
///
/// Returns `KmerError::InvalidParameter` if `k` is zero or exceeds the
/// supported bound. Sequences shorter than `k` contribute nothing.
pub fn generate(sequences: &[Sequence], k: usize) -> Result<Vec<KMer>, KmerError> {
    if let Some(msg) = check_k(k) {
        return Err(KmerError::InvalidParameter(msg));
    }

    let mut kmers = Vec::new();
    for seq in sequences {
        for (start, text) in windows(seq, k) {
            kmers.push(KMer {
                source_name: seq.name.clone(),
                source_length: seq.len(),
                start,
                end: start + k - 1,
                text: text.to_string(),
                k,
            });
        }
    }
    Ok(kmers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_counts_and_positions() {
        let seqs = vec![Sequence::new("P1", "ABCDEFG")];
        let kmers = generate(&seqs, 3).unwrap();

        // L - k + 1 = 5 windows, starts 1..=5
        assert_eq!(kmers.len(), 5);
        for (i, kmer) in kmers.iter().enumerate() {
            assert_eq!(kmer.start, i + 1);
            assert_eq!(kmer.end, kmer.start + 2);
            assert_eq!(kmer.text.len(), 3);
            assert_eq!(kmer.source_length, 7);
        }
        assert_eq!(kmers[0].text, "ABC");
        assert_eq!(kmers[4].text, "EFG");
    }

    #[test]
    fn test_short_sequence_yields_nothing() {
        let seqs = vec![Sequence::new("tiny", "AB")];
        let kmers = generate(&seqs, 3).unwrap();
        assert!(kmers.is_empty());
    }

    #[test]
    fn test_exact_length_yields_one() {
        let seqs = vec![Sequence::new("P1", "ABC")];
        let kmers = generate(&seqs, 3).unwrap();
        assert_eq!(kmers.len(), 1);
        assert_eq!(kmers[0].start, 1);
        assert_eq!(kmers[0].end, 3);
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let seqs = vec![Sequence::new("P1", "ABC")];
        assert!(generate(&seqs, 0).is_err());
    }

    #[test]
    fn test_oversized_k_is_rejected() {
        let seqs = vec![Sequence::new("P1", "ABC")];
        assert!(generate(&seqs, 1001).is_err());
    }
}
