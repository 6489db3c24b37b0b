//! Results-store collaborator seam.
//!
//! The pipeline only produces in-memory records; durability belongs to an
//! external collaborator reached through [`ResultStore`]. The one
//! implementation shipped here, [`JsonFileStore`], is a small versioned
//! JSON file useful for the CLI and for tests — indexing, migration, and
//! isolation under concurrent writers are that collaborator's problem, not
//! the core's.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::annotate::normalize_accession;
use crate::core::types::AnnotatedMatch;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read store: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse store: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Store format version for compatibility checking
pub const STORE_VERSION: &str = "1.0.0";

/// Criteria for [`ResultStore::query`]. All present fields must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchFilter {
    /// Exact query protein name
    pub query_protein: Option<String>,

    /// Hit identifier, compared after accession normalization
    pub hit_identifier: Option<String>,

    /// Substring that must occur in the merged motif
    pub motif_contains: Option<String>,
}

impl MatchFilter {
    fn accepts(&self, record: &AnnotatedMatch) -> bool {
        if let Some(name) = &self.query_protein {
            if record.motif.query_protein != *name {
                return false;
            }
        }
        if let Some(id) = &self.hit_identifier {
            if normalize_accession(&record.motif.hit_protein) != normalize_accession(id) {
                return false;
            }
        }
        if let Some(text) = &self.motif_contains {
            if !record.motif.merged_text.contains(text.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Append/query interface the pipeline hands its terminal artifacts to.
pub trait ResultStore {
    /// Append records, returning the count of rows written.
    ///
    /// # Errors
    ///
    /// Implementation-specific; the pipeline treats any error as fatal for
    /// the persistence step only, never for the computation.
    fn append(&mut self, records: &[AnnotatedMatch]) -> Result<usize, StoreError>;

    /// Return every stored record accepted by the filter.
    ///
    /// # Errors
    ///
    /// Implementation-specific read/parse failures.
    fn query(&self, filter: &MatchFilter) -> Result<Vec<AnnotatedMatch>, StoreError>;
}

/// Serializable store file format
#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    version: String,
    created_at: String,
    records: Vec<AnnotatedMatch>,
}

impl StoreData {
    fn empty() -> Self {
        Self {
            version: STORE_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            records: Vec::new(),
        }
    }
}

/// A versioned JSON file holding annotated matches.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreData, StoreError> {
        if !self.path.exists() {
            return Ok(StoreData::empty());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let data: StoreData = serde_json::from_str(&content)?;
        if data.version != STORE_VERSION {
            tracing::warn!(
                expected = STORE_VERSION,
                found = %data.version,
                "store version mismatch"
            );
        }
        Ok(data)
    }

    fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ResultStore for JsonFileStore {
    fn append(&mut self, records: &[AnnotatedMatch]) -> Result<usize, StoreError> {
        let mut data = self.load()?;
        data.records.extend_from_slice(records);
        self.save(&data)?;
        debug!(
            added = records.len(),
            total = data.records.len(),
            path = %self.path.display(),
            "appended annotated matches"
        );
        Ok(records.len())
    }

    fn query(&self, filter: &MatchFilter) -> Result<Vec<AnnotatedMatch>, StoreError> {
        let data = self.load()?;
        Ok(data
            .records
            .into_iter()
            .filter(|record| filter.accepts(record))
            .collect())
    }
}
