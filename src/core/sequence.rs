use serde::{Deserialize, Serialize};

/// A single named sequence read from an input source.
///
/// Residues are restricted to uppercase ASCII letters; the reader discards
/// everything else during parsing, so a `Sequence` never contains whitespace,
/// digits, or lowercase characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Free-text name taken from the header line (without the `>` sentinel)
    pub name: String,

    /// Sanitized residue string, uppercase ASCII letters only
    pub residues: String,
}

impl Sequence {
    pub fn new(name: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            residues: residues.into(),
        }
    }

    /// Number of residues
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
