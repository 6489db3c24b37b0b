//! Reader for line-oriented sequence records.
//!
//! The format is deliberately forgiving: a record starts with a `>` header
//! line carrying a free-text name, followed by any number of residue lines.
//! Blank lines are skipped, residue lines are uppercased and stripped of
//! every non-letter character (so `10  mlsd EARK` contributes `MLSDEARK`),
//! and content before the first header is ignored with a warning rather
//! than rejected.
//!
//! Parsing is lazy and single-pass: [`SequenceReader`] yields one
//! [`Sequence`] at a time and is restartable only by reopening the source.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::warn;

use crate::core::sequence::Sequence;
use crate::utils::validation::check_sequence_limit;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid sequence input: {0}")]
    InvalidFormat(String),

    #[error("Too many sequences: {0} exceeds maximum allowed")]
    TooManySequences(usize),
}

/// Lazy iterator over the records of a line-oriented sequence source.
pub struct SequenceReader<R: BufRead> {
    lines: std::io::Lines<R>,
    pending_name: Option<String>,
    chunks: Vec<String>,
    yielded: usize,
    saw_leading_junk: bool,
    done: bool,
}

impl<R: BufRead> SequenceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending_name: None,
            chunks: Vec::new(),
            yielded: 0,
            saw_leading_junk: false,
            done: false,
        }
    }

    fn flush(&mut self) -> Option<Sequence> {
        let name = self.pending_name.take()?;
        let residues = sanitize_residues(&self.chunks);
        self.chunks.clear();
        Some(Sequence { name, residues })
    }
}

impl<R: BufRead> Iterator for SequenceReader<R> {
    type Item = Result<Sequence, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(ParseError::Io(e)));
                }
                Some(Ok(line)) => {
                    let line = line.trim_end_matches('\r');
                    if line.is_empty() {
                        continue;
                    }
                    if let Some(name) = line.strip_prefix('>') {
                        // A new header closes the record under construction.
                        let finished = self.flush();
                        self.pending_name = Some(name.trim().to_string());

                        if let Some(seq) = finished {
                            if check_sequence_limit(self.yielded).is_some() {
                                self.done = true;
                                return Some(Err(ParseError::TooManySequences(self.yielded)));
                            }
                            self.yielded += 1;
                            return Some(Ok(seq));
                        }
                    } else if self.pending_name.is_some() {
                        self.chunks.push(line.trim().to_string());
                    } else if !self.saw_leading_junk {
                        // Residue lines before any header: recover locally.
                        self.saw_leading_junk = true;
                        warn!("ignoring content before first '>' header");
                    }
                }
                None => {
                    self.done = true;
                    if let Some(seq) = self.flush() {
                        if check_sequence_limit(self.yielded).is_some() {
                            return Some(Err(ParseError::TooManySequences(self.yielded)));
                        }
                        self.yielded += 1;
                        return Some(Ok(seq));
                    }
                    return None;
                }
            }
        }
    }
}

/// Uppercase the collected residue lines and drop every non-letter.
fn sanitize_residues(chunks: &[String]) -> String {
    chunks
        .iter()
        .flat_map(|chunk| chunk.chars())
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
        .collect()
}

/// Check if the path looks gzip-compressed
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Open a sequence file, decompressing `.gz` transparently, and collect all
/// of its records.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::TooManySequences` if the limit is exceeded. A file with no
/// records at all is an `InvalidFormat` error.
pub fn read_sequences(path: &Path) -> Result<Vec<Sequence>, ParseError> {
    let file = File::open(path)?;
    let sequences = if is_gzipped(path) {
        collect(BufReader::new(GzDecoder::new(file)))?
    } else {
        collect(BufReader::new(file))?
    };

    if sequences.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "No sequence records found in {}",
            path.display()
        )));
    }
    Ok(sequences)
}

/// Parse all records from raw text (stdin or pasted input).
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the text contains no records.
pub fn parse_text(text: &str) -> Result<Vec<Sequence>, ParseError> {
    let sequences = collect(Cursor::new(text))?;
    if sequences.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequence records found in input".to_string(),
        ));
    }
    Ok(sequences)
}

fn collect<B: BufRead>(reader: B) -> Result<Vec<Sequence>, ParseError> {
    SequenceReader::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_two_records() {
        let text = ">P1 first protein\nABCDE\nFGH\n>P2\nKLMN\n";
        let seqs = parse_text(text).unwrap();

        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].name, "P1 first protein");
        assert_eq!(seqs[0].residues, "ABCDEFGH");
        assert_eq!(seqs[1].name, "P2");
        assert_eq!(seqs[1].residues, "KLMN");
    }

    #[test]
    fn test_lowercase_and_noise_are_sanitized() {
        let text = ">P1\n10  mlsd EARK\n20\tqqqq-trew\n";
        let seqs = parse_text(text).unwrap();
        assert_eq!(seqs[0].residues, "MLSDEARKQQQQTREW");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let text = ">P1\n\nABC\n\n\nDEF\n";
        let seqs = parse_text(text).unwrap();
        assert_eq!(seqs[0].residues, "ABCDEF");
    }

    #[test]
    fn test_leading_junk_before_header_recovered() {
        let text = "garbage line\nmore garbage\n>P1\nABC\n";
        let seqs = parse_text(text).unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].residues, "ABC");
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(parse_text("").is_err());
        assert!(parse_text("no headers here\n").is_err());
    }

    #[test]
    fn test_reader_is_lazy() {
        let text = ">P1\nABC\n>P2\nDEF\n";
        let mut reader = SequenceReader::new(Cursor::new(text));

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.name, "P1");
        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.name, "P2");
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_read_sequences_from_file() {
        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(b">P1\nABCDEFG\n").unwrap();
        temp.flush().unwrap();

        let seqs = read_sequences(temp.path()).unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].residues, "ABCDEFG");
    }

    #[test]
    fn test_read_sequences_gzipped() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".fasta.gz").unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">P1\nABCDEFG\n").unwrap();
        let compressed = encoder.finish().unwrap();
        temp.write_all(&compressed).unwrap();
        temp.flush().unwrap();

        let seqs = read_sequences(temp.path()).unwrap();
        assert_eq!(seqs[0].residues, "ABCDEFG");
    }

    #[test]
    fn test_crlf_input() {
        let text = ">P1\r\nABC\r\nDEF\r\n";
        let seqs = parse_text(text).unwrap();
        assert_eq!(seqs[0].residues, "ABCDEF");
    }
}
