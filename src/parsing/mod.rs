//! Parsers for the pipeline's two input kinds.
//!
//! - [`fasta`]: line-oriented sequence records (`>` header plus residue
//!   lines). Residues are uppercased and stripped of non-letters, so
//!   lowercase input, whitespace, and inline line numbers are all accepted.
//!   Gzip-compressed files (`.gz`) are read transparently.
//! - [`table`]: the positional reference table, a delimited text file with
//!   identifier, name, and 1-based start/end columns. Malformed numeric
//!   fields are treated as missing rather than fatal; missing required
//!   columns are a configuration error.

pub mod fasta;
pub mod table;
