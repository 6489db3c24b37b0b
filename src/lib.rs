//! # motif-scan
//!
//! A library for locating shared fixed-length substrings ("motifs") between
//! a query sequence set and a reference sequence set, merging adjacent
//! matches into maximal contiguous motifs, and annotating each motif
//! against a positional reference table.
//!
//! The pipeline is strictly linear: read sequences, slice them into
//! overlapping k-mers with 1-based positions, compute the relation of
//! equal-text k-mer pairs, stitch runs of position-synchronized pairs into
//! maximal motifs, and enrich each motif with substring-containment and
//! interval-overlap counters.
//!
//! ## Features
//!
//! - **Interchangeable search strategies**: in-memory hash join,
//!   multi-pattern scan, and a bounded-memory external sort-merge join —
//!   all observably equivalent, selected by caller policy
//! - **Graceful degradation**: resource exhaustion in an in-memory
//!   strategy falls back to the external join instead of failing
//! - **Forgiving input**: lowercase residues, inline noise, and content
//!   before the first header are sanitized or skipped, never fatal
//! - **Batch annotation**: substring counts are computed once per distinct
//!   motif with a single multi-pattern pass over the reference names
//!
//! ## Example
//!
//! ```rust
//! use motif_scan::core::epitope::ReferenceEpitope;
//! use motif_scan::matching::Backend;
//! use motif_scan::parsing::fasta;
//! use motif_scan::pipeline;
//!
//! let queries = fasta::parse_text(">Q1\nABCDEFG\n").unwrap();
//! let hits = fasta::parse_text(">P1\nXABCDEFGY\n").unwrap();
//! let reference = vec![ReferenceEpitope {
//!     identifier: "P1".to_string(),
//!     name: "XXABCDEFGYY".to_string(),
//!     start: Some(1),
//!     end: Some(11),
//! }];
//!
//! let annotated = pipeline::run(&queries, &hits, &reference, 3, Backend::Auto).unwrap();
//! assert_eq!(annotated[0].motif.merged_text, "ABCDEFG");
//! assert_eq!(annotated[0].substring_count, 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: data model — sequences, k-mers, match pairs, motifs
//! - [`parsing`]: sequence reader and reference-table parser
//! - [`matching`]: common-substring finders and the match stitcher
//! - [`annotate`]: accession normalization and the annotation engine
//! - [`store`]: results-store collaborator seam
//! - [`pipeline`]: caller-facing entry points
//! - [`cli`]: command-line interface implementation

pub mod annotate;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod pipeline;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::annotate::AnnotationEngine;
pub use crate::core::epitope::ReferenceEpitope;
pub use crate::core::kmer::KMer;
pub use crate::core::sequence::Sequence;
pub use crate::core::types::{AnnotatedMatch, MatchPair, StitchedMatch};
pub use crate::matching::{Backend, CommonSubstringFinder};
pub use crate::store::{JsonFileStore, MatchFilter, ResultStore};
