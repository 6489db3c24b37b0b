//! Centralized validation helpers and input limits.

/// Largest window size the pipeline accepts
pub const MAX_K: usize = 1000;

/// Maximum number of sequences accepted from a single source
pub const MAX_SEQUENCES: usize = 100_000;

/// Maximum number of rows accepted from a reference positional table
pub const MAX_TABLE_ROWS: usize = 1_000_000;

/// Validate a window size before any parsing happens.
///
/// Returns an error message if `k` is out of bounds, `None` if it is usable.
#[must_use]
pub fn check_k(k: usize) -> Option<String> {
    if k == 0 {
        Some("k must be a positive integer".to_string())
    } else if k > MAX_K {
        Some(format!("k = {k} exceeds maximum supported window size {MAX_K}"))
    } else {
        None
    }
}

/// Check if adding another sequence would exceed the maximum allowed.
///
/// Call this with the current count BEFORE pushing a new sequence.
#[must_use]
pub fn check_sequence_limit(count: usize) -> Option<String> {
    if count >= MAX_SEQUENCES {
        Some(format!(
            "Too many sequences: adding another would exceed maximum of {MAX_SEQUENCES}"
        ))
    } else {
        None
    }
}

/// Check if adding another table row would exceed the maximum allowed.
#[must_use]
pub fn check_table_row_limit(count: usize) -> Option<String> {
    if count >= MAX_TABLE_ROWS {
        Some(format!(
            "Too many reference rows: adding another would exceed maximum of {MAX_TABLE_ROWS}"
        ))
    } else {
        None
    }
}
