use serde::{Deserialize, Serialize};

/// One row of the positional reference table.
///
/// `start`/`end` are 1-based inclusive. Rows with malformed numeric fields
/// keep `None` positions: they still count toward identifier and substring
/// statistics but are excluded from interval math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEpitope {
    /// Accession, possibly in the pipe-delimited `db|ID|name` wrapper form
    pub identifier: String,

    /// Epitope name / descriptive text searched for motif substrings
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl ReferenceEpitope {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            start: None,
            end: None,
        }
    }

    #[cfg(test)]
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Both positions parsed successfully
    pub fn has_span(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}
