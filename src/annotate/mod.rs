//! Annotation of stitched matches against the positional reference table.
//!
//! Each stitched match gains four derived counters:
//!
//! - `substring_count`: distinct reference rows whose name contains the
//!   merged motif, computed once per distinct motif for the whole batch
//!   with a single multi-pattern pass over every reference name.
//! - `reference_data_count`: rows whose normalized identifier equals the
//!   match's normalized hit identifier.
//! - `fully_contained_count` / `partial_overlap_count`: interval
//!   comparisons against the rows sharing the hit identifier. These are
//!   independent counters — containment also counts as overlap.
//!
//! Rows are grouped by normalized identifier up front so interval math
//! never crosses unrelated proteins.

pub mod accession;
pub mod engine;

pub use accession::normalize_accession;
pub use engine::AnnotationEngine;
