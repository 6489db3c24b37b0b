use serde::{Deserialize, Serialize};

use crate::core::kmer::KMer;

/// A pair of k-mers, one from the query set and one from the hit set,
/// sharing the same text.
///
/// Match pairs are ephemeral: the finder produces them and the stitcher
/// consumes them entirely. Since the texts are equal by construction, only
/// one copy is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    /// Shared k-mer text (`query_kmer.text == hit_kmer.text`)
    pub text: String,

    pub query_protein: String,
    pub query_length: usize,
    pub query_start: usize,
    pub query_end: usize,

    pub hit_protein: String,
    pub hit_length: usize,
    pub hit_start: usize,
    pub hit_end: usize,

    pub k: usize,
}

impl MatchPair {
    /// Build a pair from two k-mers with equal text.
    pub fn from_kmers(query: &KMer, hit: &KMer) -> Self {
        debug_assert_eq!(query.text, hit.text);
        Self {
            text: query.text.clone(),
            query_protein: query.source_name.clone(),
            query_length: query.source_length,
            query_start: query.start,
            query_end: query.end,
            hit_protein: hit.source_name.clone(),
            hit_length: hit.source_length,
            hit_start: hit.start,
            hit_end: hit.end,
            k: query.k,
        }
    }
}

/// A maximal contiguous match produced by stitching a run of
/// position-synchronized match pairs.
///
/// Invariant: `length == query_end - query_start + 1 == hit_end - hit_start + 1`
/// and `length == merged_text.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchedMatch {
    #[serde(rename = "merged_motif")]
    pub merged_text: String,

    #[serde(rename = "query_protein_name")]
    pub query_protein: String,
    #[serde(rename = "query_protein_length")]
    pub query_length: usize,

    #[serde(rename = "motif_length")]
    pub length: usize,

    pub query_start: usize,
    pub query_end: usize,

    #[serde(rename = "hit_protein_name")]
    pub hit_protein: String,
    #[serde(rename = "hit_protein_length")]
    pub hit_length: usize,

    pub hit_start: usize,
    pub hit_end: usize,
}

/// A stitched match plus the four counters derived from the reference
/// positional table. Terminal artifact of the pipeline.
///
/// `fully_contained_count` and `partial_overlap_count` are independent
/// counters, not exclusive categories: full containment also counts as an
/// overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedMatch {
    #[serde(flatten)]
    pub motif: StitchedMatch,

    /// Distinct reference rows whose `name` contains the merged motif
    pub substring_count: usize,

    /// Reference rows whose normalized identifier equals the hit identifier
    pub reference_data_count: usize,

    /// Grouped rows whose interval fully encloses the hit range
    pub fully_contained_count: usize,

    /// Grouped rows whose interval shares at least one position with the hit range
    pub partial_overlap_count: usize,
}
