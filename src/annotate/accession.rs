//! Accession identifier normalization.

/// Extract the bare identifier from a pipe-delimited accession wrapper.
///
/// `"sp|P12345|NAME"` becomes `"P12345"`; a string without a usable second
/// pipe field is returned verbatim, trimmed.
///
/// # Examples
///
/// ```
/// use motif_scan::annotate::normalize_accession;
///
/// assert_eq!(normalize_accession("sp|P12345|HA1B_MOUSE"), "P12345");
/// assert_eq!(normalize_accession("P67890"), "P67890");
/// assert_eq!(normalize_accession("  tr|Q9XYZ1|X  "), "Q9XYZ1");
/// ```
#[must_use]
pub fn normalize_accession(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(3, '|');
    parts.next();
    match parts.next() {
        Some(core) if !core.trim().is_empty() => core.trim().to_string(),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_accession() {
        assert_eq!(normalize_accession("sp|P12345|NAME"), "P12345");
        assert_eq!(normalize_accession("tr|A0A024R161|SOME_HUMAN"), "A0A024R161");
    }

    #[test]
    fn test_bare_accession_unchanged() {
        assert_eq!(normalize_accession("P67890"), "P67890");
        assert_eq!(normalize_accession("  P67890 "), "P67890");
    }

    #[test]
    fn test_degenerate_pipes_fall_back_to_whole_string() {
        assert_eq!(normalize_accession("sp|"), "sp|");
        assert_eq!(normalize_accession("sp||NAME"), "sp||NAME");
        assert_eq!(normalize_accession("|"), "|");
    }

    #[test]
    fn test_extra_pipe_fields_ignored() {
        assert_eq!(normalize_accession("sp|P12345|NAME|extra|junk"), "P12345");
    }
}
