//! Parser for the positional reference table.
//!
//! The table is delimited text (comma or tab) with a header row naming at
//! least an identifier column, a name column, and start/end position
//! columns. Header matching is case-insensitive and accepts the common
//! spellings used by epitope exports (`UniProt_ID`, `Starting Position`,
//! ...). Fields may be double-quoted; a UTF-8 BOM is tolerated.
//!
//! Missing required columns are fatal ([`TableError::MissingColumn`]);
//! malformed numeric fields in data rows are not — the row is kept with the
//! position treated as missing.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::core::epitope::ReferenceEpitope;
use crate::utils::validation::check_table_row_limit;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reference table is missing required column: {0}")]
    MissingColumn(String),

    #[error("Reference table has no header row")]
    EmptyTable,

    #[error("Too many reference rows: {0} exceeds maximum allowed")]
    TooManyRows(usize),
}

/// Accepted header spellings, lowercased, per required column.
const IDENTIFIER_HEADERS: &[&str] = &["uniprot_id", "uniprot id", "identifier", "protein_id"];
const NAME_HEADERS: &[&str] = &["name", "epitope", "epitope_name"];
const START_HEADERS: &[&str] = &["starting position", "starting_position", "start"];
const END_HEADERS: &[&str] = &["ending position", "ending_position", "end"];

/// Parse a reference table file, guessing the delimiter from the extension
/// (`.tsv` means tab, anything else comma).
///
/// # Errors
///
/// Returns `TableError::Io` if the file cannot be read, `MissingColumn` /
/// `EmptyTable` if the header is unusable, or `TooManyRows` if the limit is
/// exceeded.
pub fn parse_table_file(path: &Path) -> Result<Vec<ReferenceEpitope>, TableError> {
    let delimiter = if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"))
    {
        '\t'
    } else {
        ','
    };
    let content = std::fs::read_to_string(path)?;
    parse_table_text(&content, delimiter)
}

/// Parse reference table text with an explicit delimiter.
///
/// # Errors
///
/// Returns `TableError::MissingColumn`, `EmptyTable`, or `TooManyRows` as
/// described on [`parse_table_file`].
pub fn parse_table_text(text: &str, delimiter: char) -> Result<Vec<ReferenceEpitope>, TableError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines.next().ok_or(TableError::EmptyTable)?;
    let columns = resolve_columns(header, delimiter)?;

    let mut records = Vec::new();
    for line in lines {
        if check_table_row_limit(records.len()).is_some() {
            return Err(TableError::TooManyRows(records.len()));
        }

        let fields = split_fields(line, delimiter);
        let field = |idx: usize| fields.get(idx).map(|f| f.trim()).unwrap_or("");

        records.push(ReferenceEpitope {
            identifier: field(columns.identifier).to_string(),
            name: field(columns.name).to_string(),
            start: parse_position(field(columns.start)),
            end: parse_position(field(columns.end)),
        });
    }

    debug!(rows = records.len(), "parsed reference table");
    Ok(records)
}

struct ColumnMap {
    identifier: usize,
    name: usize,
    start: usize,
    end: usize,
}

fn resolve_columns(header: &str, delimiter: char) -> Result<ColumnMap, TableError> {
    let headers: Vec<String> = split_fields(header, delimiter)
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let find = |accepted: &[&str], label: &str| -> Result<usize, TableError> {
        headers
            .iter()
            .position(|h| accepted.contains(&h.as_str()))
            .ok_or_else(|| TableError::MissingColumn(label.to_string()))
    };

    Ok(ColumnMap {
        identifier: find(IDENTIFIER_HEADERS, "identifier (e.g. UniProt_ID)")?,
        name: find(NAME_HEADERS, "name")?,
        start: find(START_HEADERS, "starting position")?,
        end: find(END_HEADERS, "ending position")?,
    })
}

/// Split one line into fields, honoring double-quoted fields that may
/// contain the delimiter. Doubled quotes inside a quoted field unescape to
/// one quote.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

/// Parse a 1-based position, treating anything non-numeric as missing.
/// Accepts integral floats (`"23.0"`) since some exports render them that way.
fn parse_position(field: &str) -> Option<usize> {
    if field.is_empty() {
        return None;
    }
    if let Ok(n) = field.parse::<usize>() {
        return Some(n);
    }
    match field.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Some(f as usize),
        _ => None,
    }
}
