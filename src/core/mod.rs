//! Core data types for the motif matching pipeline.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Sequence`]: A named residue string produced by the sequence reader
//! - [`KMer`]: A fixed-length window of a sequence with 1-based coordinates
//! - [`MatchPair`]: A (query k-mer, hit k-mer) pair with equal text
//! - [`StitchedMatch`]: A maximal run of synchronized matches merged into one motif
//! - [`ReferenceEpitope`]: One row of the positional reference table
//! - [`AnnotatedMatch`]: A stitched match enriched with reference counters
//!
//! ## Coordinates
//!
//! All positions are 1-based and inclusive: a k-mer starting at position `s`
//! covers residues `s..=s + k - 1`. A sequence of length `L` yields
//! `max(0, L - k + 1)` k-mers.

pub mod epitope;
pub mod kmer;
pub mod sequence;
pub mod types;
