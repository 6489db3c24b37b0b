//! Stitching of adjacent match pairs into maximal contiguous matches.
//!
//! The input relation is unordered; stitching first stable-sorts it by
//! `(hit_protein, query_protein, hit_start, query_start)` and then merges
//! each maximal run in which every consecutive pair keeps the same
//! protein identity and advances by exactly one residue on both sides.
//! Consecutive k-mers in such a run overlap in all but their last
//! character, so the merged motif is rebuilt by appending last characters
//! — no rescan of the source sequences is needed.
//!
//! Where one position could extend via several alternative alignments,
//! the run assembled by the stable sort order wins; no extra tie-breaking
//! is applied.

use tracing::debug;

use crate::core::types::{MatchPair, StitchedMatch};

/// Merge runs of position-synchronized match pairs.
///
/// Output is sorted by `(merged_text, hit_start)` ascending, stable. A
/// pair that extends no run passes through unchanged with `length == k`.
pub fn stitch(mut pairs: Vec<MatchPair>) -> Vec<StitchedMatch> {
    pairs.sort_by(|a, b| {
        (&a.hit_protein, &a.query_protein, a.hit_start, a.query_start).cmp(&(
            &b.hit_protein,
            &b.query_protein,
            b.hit_start,
            b.query_start,
        ))
    });

    let mut stitched: Vec<StitchedMatch> = Vec::new();
    let mut run: Vec<&MatchPair> = Vec::new();

    for pair in &pairs {
        let continues = run.last().is_some_and(|prev| {
            prev.hit_protein == pair.hit_protein
                && prev.query_protein == pair.query_protein
                && pair.hit_start == prev.hit_start + 1
                && pair.query_start == prev.query_start + 1
        });
        if !continues {
            if let Some(merged) = merge_run(&run) {
                stitched.push(merged);
            }
            run.clear();
        }
        run.push(pair);
    }
    if let Some(merged) = merge_run(&run) {
        stitched.push(merged);
    }

    stitched.sort_by(|a, b| (&a.merged_text, a.hit_start).cmp(&(&b.merged_text, b.hit_start)));

    debug!(pairs = pairs.len(), motifs = stitched.len(), "stitched match pairs");
    stitched
}

fn merge_run(run: &[&MatchPair]) -> Option<StitchedMatch> {
    let first = run.first()?;

    let mut merged_text = first.text.clone();
    for pair in &run[1..] {
        if let Some(last) = pair.text.chars().last() {
            merged_text.push(last);
        }
    }

    let length = merged_text.len();
    Some(StitchedMatch {
        query_protein: first.query_protein.clone(),
        query_length: first.query_length,
        length,
        query_start: first.query_start,
        query_end: first.query_start + length - 1,
        hit_protein: first.hit_protein.clone(),
        hit_length: first.hit_length,
        hit_start: first.hit_start,
        hit_end: first.hit_start + length - 1,
        merged_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(
        text: &str,
        query_protein: &str,
        query_start: usize,
        hit_protein: &str,
        hit_start: usize,
    ) -> MatchPair {
        let k = text.len();
        MatchPair {
            text: text.to_string(),
            query_protein: query_protein.to_string(),
            query_length: 50,
            query_start,
            query_end: query_start + k - 1,
            hit_protein: hit_protein.to_string(),
            hit_length: 60,
            hit_start,
            hit_end: hit_start + k - 1,
            k,
        }
    }

    #[test]
    fn test_stitch_full_run() {
        // Five pairs advancing +1/+1: ABCDEFG against a hit offset by one
        let pairs = vec![
            pair("ABC", "Q1", 1, "H1", 2),
            pair("BCD", "Q1", 2, "H1", 3),
            pair("CDE", "Q1", 3, "H1", 4),
            pair("DEF", "Q1", 4, "H1", 5),
            pair("EFG", "Q1", 5, "H1", 6),
        ];

        let out = stitch(pairs);
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.merged_text, "ABCDEFG");
        assert_eq!(m.length, 7);
        assert_eq!((m.query_start, m.query_end), (1, 7));
        assert_eq!((m.hit_start, m.hit_end), (2, 8));
        assert_eq!(m.hit_end - m.hit_start, m.query_end - m.query_start);
    }

    #[test]
    fn test_stitch_unordered_input() {
        let pairs = vec![
            pair("CDE", "Q1", 3, "H1", 4),
            pair("ABC", "Q1", 1, "H1", 2),
            pair("BCD", "Q1", 2, "H1", 3),
        ];
        let out = stitch(pairs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].merged_text, "ABCDE");
    }

    #[test]
    fn test_run_breaks_on_identity_change() {
        let pairs = vec![
            pair("ABC", "Q1", 1, "H1", 1),
            pair("BCD", "Q1", 2, "H2", 2),
        ];
        let out = stitch(pairs);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_run_breaks_on_desynchronized_step() {
        // hit advances by 1 but query jumps by 4
        let pairs = vec![
            pair("ABC", "Q1", 1, "H1", 1),
            pair("ABC", "Q1", 5, "H1", 2),
        ];
        let out = stitch(pairs);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|m| m.length == 3));
    }

    #[test]
    fn test_singleton_passes_through() {
        let pairs = vec![pair("XYZ", "Q1", 4, "H1", 9)];
        let out = stitch(pairs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].merged_text, "XYZ");
        assert_eq!(out[0].length, 3);
        assert_eq!((out[0].hit_start, out[0].hit_end), (9, 11));
    }

    #[test]
    fn test_output_sorted_by_text_then_hit_start() {
        let pairs = vec![
            pair("ZZZ", "Q1", 1, "H1", 1),
            pair("AAA", "Q1", 10, "H1", 20),
            pair("AAA", "Q2", 10, "H2", 5),
        ];
        let out = stitch(pairs);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].merged_text, "AAA");
        assert_eq!(out[0].hit_start, 5);
        assert_eq!(out[1].hit_start, 20);
        assert_eq!(out[2].merged_text, "ZZZ");
    }

    #[test]
    fn test_stitching_is_idempotent() {
        let pairs = vec![
            pair("ABC", "Q1", 1, "H1", 2),
            pair("BCD", "Q1", 2, "H1", 3),
            pair("CDE", "Q1", 3, "H1", 4),
            pair("XYZ", "Q2", 7, "H2", 1),
        ];
        let once = stitch(pairs);

        // Feed the stitched output back as length-1 runs
        let reinjected: Vec<MatchPair> = once
            .iter()
            .map(|m| MatchPair {
                text: m.merged_text.clone(),
                query_protein: m.query_protein.clone(),
                query_length: m.query_length,
                query_start: m.query_start,
                query_end: m.query_end,
                hit_protein: m.hit_protein.clone(),
                hit_length: m.hit_length,
                hit_start: m.hit_start,
                hit_end: m.hit_end,
                k: m.length,
            })
            .collect();

        let twice = stitch(reinjected);
        assert_eq!(once, twice);
    }
}
