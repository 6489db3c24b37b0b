//! Caller-facing pipeline entry points.
//!
//! Control flow is strictly linear: read sequences, generate k-mers, find
//! common substrings, stitch, annotate. Each invocation is a synchronous
//! single-threaded batch with no shared state; timeout and retry policy
//! belong to whoever calls [`run`]. The pipeline either returns a complete
//! result or fails with one error — it never returns partially annotated
//! rows.

use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::annotate::AnnotationEngine;
use crate::core::epitope::ReferenceEpitope;
use crate::core::sequence::Sequence;
use crate::core::types::{AnnotatedMatch, StitchedMatch};
use crate::matching::finder::{finder_for, Backend};
use crate::matching::stitch::stitch;
use crate::matching::FindError;
use crate::parsing::fasta::{self, ParseError};
use crate::parsing::table::{self, TableError};
use crate::utils::validation::check_k;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Find(#[from] FindError),
}

/// Run the matching half of the pipeline: find common k-mers between the
/// two sequence sets and stitch them into maximal contiguous matches.
///
/// # Errors
///
/// Fails fast with `InvalidParameter` before touching any input if `k` is
/// out of bounds; otherwise propagates finder errors.
pub fn run_matching(
    queries: &[Sequence],
    hits: &[Sequence],
    k: usize,
    backend: Backend,
) -> Result<Vec<StitchedMatch>, PipelineError> {
    if let Some(msg) = check_k(k) {
        return Err(PipelineError::InvalidParameter(msg));
    }

    let started = Instant::now();
    let finder = finder_for(backend);
    let pairs = finder.find_common(queries, hits, k)?;
    debug!(pairs = pairs.len(), elapsed = ?started.elapsed(), "common-substring search done");

    let stitch_started = Instant::now();
    let stitched = stitch(pairs);
    debug!(motifs = stitched.len(), elapsed = ?stitch_started.elapsed(), "stitching done");

    Ok(stitched)
}

/// Run the full pipeline against an already-parsed reference table.
///
/// # Errors
///
/// See [`run_matching`]; annotation itself does not fail — unmatched hit
/// identifiers simply produce zero counters.
pub fn run(
    queries: &[Sequence],
    hits: &[Sequence],
    reference: &[ReferenceEpitope],
    k: usize,
    backend: Backend,
) -> Result<Vec<AnnotatedMatch>, PipelineError> {
    let started = Instant::now();
    let stitched = run_matching(queries, hits, k, backend)?;

    let engine = AnnotationEngine::new(reference);
    let annotated = engine.annotate(stitched);

    info!(
        matches = annotated.len(),
        reference_rows = reference.len(),
        elapsed = ?started.elapsed(),
        "pipeline complete"
    );
    Ok(annotated)
}

/// Convenience entry: parse all three inputs from files and run the full
/// pipeline. Sequence files may be gzip-compressed.
///
/// # Errors
///
/// Parameter validation happens before any file is opened; parsing and
/// finder errors propagate unchanged.
pub fn run_from_paths(
    query_path: &Path,
    hit_path: &Path,
    table_path: &Path,
    k: usize,
    backend: Backend,
) -> Result<Vec<AnnotatedMatch>, PipelineError> {
    if let Some(msg) = check_k(k) {
        return Err(PipelineError::InvalidParameter(msg));
    }

    let queries = fasta::read_sequences(query_path)?;
    let hits = fasta::read_sequences(hit_path)?;
    let reference = table::parse_table_file(table_path)?;

    run(&queries, &hits, &reference, k, backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_matching() {
        let queries = vec![Sequence::new("Q1", "ABCDEFG")];
        let hits = vec![Sequence::new("H1", "XABCDEFGY")];

        let stitched = run_matching(&queries, &hits, 3, Backend::Auto).unwrap();
        assert_eq!(stitched.len(), 1);
        let m = &stitched[0];
        assert_eq!(m.merged_text, "ABCDEFG");
        assert_eq!((m.query_start, m.query_end), (1, 7));
        assert_eq!((m.hit_start, m.hit_end), (2, 8));
    }

    #[test]
    fn test_invalid_k_fails_fast() {
        let err = run_matching(&[], &[], 0, Backend::Auto).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidParameter(_)));

        let err = run_matching(&[], &[], 1001, Backend::Auto).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidParameter(_)));
    }

    #[test]
    fn test_full_run_with_annotation() {
        let queries = vec![Sequence::new("Q1", "ABCDEFG")];
        let hits = vec![Sequence::new("P1", "XABCDEFGY")];
        let reference = vec![ReferenceEpitope::new("P1", "XXABCDEFGYY").with_span(1, 11)];

        let annotated = run(&queries, &hits, &reference, 3, Backend::Auto).unwrap();
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].substring_count, 1);
        assert_eq!(annotated[0].reference_data_count, 1);
        assert_eq!(annotated[0].fully_contained_count, 1);
        assert_eq!(annotated[0].partial_overlap_count, 1);
    }

    #[test]
    fn test_short_sequences_produce_no_matches() {
        let queries = vec![Sequence::new("Q1", "AB")];
        let hits = vec![Sequence::new("H1", "ABCDE")];
        let stitched = run_matching(&queries, &hits, 3, Backend::Auto).unwrap();
        assert!(stitched.is_empty());
    }

    #[test]
    fn test_backends_agree_end_to_end() {
        let queries = vec![
            Sequence::new("Q1", "MKVLABCDEFGHIJ"),
            Sequence::new("Q2", "ABCDABCD"),
        ];
        let hits = vec![
            Sequence::new("H1", "ZZABCDEFGHZZ"),
            Sequence::new("H2", "ABCDABCDABCD"),
        ];

        let reference = run_matching(&queries, &hits, 4, Backend::Index).unwrap();
        for backend in [Backend::Scan, Backend::External, Backend::Auto] {
            let other = run_matching(&queries, &hits, 4, backend).unwrap();
            assert_eq!(other, reference, "backend {backend:?} disagrees");
        }
    }
}
