//! Multi-pattern scan over hit sequences.
//!
//! Only the query side is indexed; each hit sequence is then scanned once,
//! left to right, emitting a match pair for every query occurrence of the
//! window ending at the current position. Cost is linear in total hit
//! sequence length rather than hit k-mer count.
//!
//! With the `automaton` feature the scan runs on an Aho-Corasick automaton
//! built over all distinct query k-mers; without it, a dictionary lookup
//! per fixed-size window does the same work with identical results.

use std::collections::HashMap;

use tracing::debug;

use crate::core::kmer::{windows, KmerError};
use crate::core::sequence::Sequence;
use crate::core::types::MatchPair;
use crate::matching::finder::{CommonSubstringFinder, FindError};
use crate::utils::validation::check_k;

/// One query-side occurrence of a k-mer text.
#[derive(Debug, Clone, Copy)]
struct QueryOccurrence {
    /// Index into the query sequence slice
    seq: usize,
    /// 1-based start position
    start: usize,
}

#[derive(Debug, Default)]
pub struct ScanFinder;

impl ScanFinder {
    fn build_dictionary<'a>(
        queries: &'a [Sequence],
        k: usize,
    ) -> HashMap<&'a str, Vec<QueryOccurrence>> {
        let mut dict: HashMap<&str, Vec<QueryOccurrence>> = HashMap::new();
        for (seq_idx, seq) in queries.iter().enumerate() {
            for (start, text) in windows(seq, k) {
                dict.entry(text)
                    .or_default()
                    .push(QueryOccurrence { seq: seq_idx, start });
            }
        }
        dict
    }

    fn emit(
        pairs: &mut Vec<MatchPair>,
        queries: &[Sequence],
        occurrences: &[QueryOccurrence],
        hit: &Sequence,
        hit_start: usize,
        text: &str,
        k: usize,
    ) {
        for occ in occurrences {
            let query = &queries[occ.seq];
            pairs.push(MatchPair {
                text: text.to_string(),
                query_protein: query.name.clone(),
                query_length: query.len(),
                query_start: occ.start,
                query_end: occ.start + k - 1,
                hit_protein: hit.name.clone(),
                hit_length: hit.len(),
                hit_start,
                hit_end: hit_start + k - 1,
                k,
            });
        }
    }

    #[cfg(feature = "automaton")]
    fn scan(
        queries: &[Sequence],
        hits: &[Sequence],
        dict: &HashMap<&str, Vec<QueryOccurrence>>,
        k: usize,
    ) -> Result<Vec<MatchPair>, FindError> {
        let patterns: Vec<&str> = dict.keys().copied().collect();
        let automaton = aho_corasick::AhoCorasick::new(&patterns)
            .map_err(|e| FindError::Automaton(e.to_string()))?;

        let mut pairs = Vec::new();
        for hit in hits {
            for mat in automaton.find_overlapping_iter(&hit.residues) {
                let text = patterns[mat.pattern().as_usize()];
                let hit_start = mat.start() + 1;
                Self::emit(&mut pairs, queries, &dict[text], hit, hit_start, text, k);
            }
        }
        Ok(pairs)
    }

    #[cfg(not(feature = "automaton"))]
    fn scan(
        queries: &[Sequence],
        hits: &[Sequence],
        dict: &HashMap<&str, Vec<QueryOccurrence>>,
        k: usize,
    ) -> Result<Vec<MatchPair>, FindError> {
        let mut pairs = Vec::new();
        for hit in hits {
            for (hit_start, text) in windows(hit, k) {
                if let Some(occurrences) = dict.get(text) {
                    Self::emit(&mut pairs, queries, occurrences, hit, hit_start, text, k);
                }
            }
        }
        Ok(pairs)
    }
}

impl CommonSubstringFinder for ScanFinder {
    fn find_common(
        &self,
        queries: &[Sequence],
        hits: &[Sequence],
        k: usize,
    ) -> Result<Vec<MatchPair>, FindError> {
        if let Some(msg) = check_k(k) {
            return Err(FindError::Kmer(KmerError::InvalidParameter(msg)));
        }

        let dict = Self::build_dictionary(queries, k);
        if dict.is_empty() {
            return Ok(Vec::new());
        }

        let pairs = Self::scan(queries, hits, &dict, k)?;
        debug!(
            patterns = dict.len(),
            pairs = pairs.len(),
            "scan complete"
        );
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::hash_join::HashJoinFinder;

    fn sorted_pairs(mut pairs: Vec<MatchPair>) -> Vec<MatchPair> {
        pairs.sort_by(|a, b| {
            (&a.text, &a.query_protein, a.query_start, &a.hit_protein, a.hit_start).cmp(&(
                &b.text,
                &b.query_protein,
                b.query_start,
                &b.hit_protein,
                b.hit_start,
            ))
        });
        pairs
    }

    #[test]
    fn test_scan_basic() {
        let queries = vec![Sequence::new("Q1", "ABCDEFG")];
        let hits = vec![Sequence::new("H1", "XABCDEFGY")];

        let pairs = ScanFinder.find_common(&queries, &hits, 3).unwrap();
        assert_eq!(pairs.len(), 5);
    }

    #[test]
    fn test_scan_agrees_with_hash_join() {
        let queries = vec![
            Sequence::new("Q1", "ABABABCD"),
            Sequence::new("Q2", "CDCDAB"),
        ];
        let hits = vec![
            Sequence::new("H1", "ABCDABCD"),
            Sequence::new("H2", "DCDCDC"),
        ];

        for k in 2..=4 {
            let scanned = ScanFinder.find_common(&queries, &hits, k).unwrap();
            let joined = HashJoinFinder::new().find_common(&queries, &hits, k).unwrap();
            assert_eq!(
                sorted_pairs(scanned),
                sorted_pairs(joined),
                "strategies disagree at k={k}"
            );
        }
    }

    #[test]
    fn test_scan_overlapping_hits() {
        // "AAA" occurs at positions 1..=3 in "AAAAA"
        let queries = vec![Sequence::new("Q1", "AAA")];
        let hits = vec![Sequence::new("H1", "AAAAA")];

        let pairs = ScanFinder.find_common(&queries, &hits, 3).unwrap();
        assert_eq!(pairs.len(), 3);
        let mut starts: Vec<usize> = pairs.iter().map(|p| p.hit_start).collect();
        starts.sort_unstable();
        assert_eq!(starts, vec![1, 2, 3]);
    }

    #[test]
    fn test_scan_empty_query_side() {
        let queries = vec![Sequence::new("Q1", "AB")];
        let hits = vec![Sequence::new("H1", "ABCDE")];
        let pairs = ScanFinder.find_common(&queries, &hits, 3).unwrap();
        assert!(pairs.is_empty());
    }
}
