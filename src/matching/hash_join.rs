//! In-memory indexed hash join over two k-mer sets.

use std::collections::HashMap;

use tracing::debug;

use crate::core::kmer::{generate, KMer};
use crate::core::sequence::Sequence;
use crate::core::types::MatchPair;
use crate::matching::finder::{CommonSubstringFinder, FindError};

/// Materializes both k-mer sets, indexes the query side by text, and probes
/// with the hit side. Memory use is proportional to total k-mer count.
#[derive(Debug, Default)]
pub struct HashJoinFinder {
    /// Refuse inputs whose combined k-mer count exceeds this, reporting
    /// resource exhaustion instead of attempting the allocation. `None`
    /// relies on allocator feedback (`try_reserve`) alone.
    pub max_kmers: Option<usize>,
}

impl HashJoinFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the combined k-mer count this finder will attempt in memory.
    pub fn with_kmer_budget(max_kmers: usize) -> Self {
        Self {
            max_kmers: Some(max_kmers),
        }
    }
}

fn window_count(sequences: &[Sequence], k: usize) -> usize {
    sequences
        .iter()
        .map(|s| s.len().saturating_sub(k - 1))
        .sum()
}

impl CommonSubstringFinder for HashJoinFinder {
    fn find_common(
        &self,
        queries: &[Sequence],
        hits: &[Sequence],
        k: usize,
    ) -> Result<Vec<MatchPair>, FindError> {
        let query_kmers = generate(queries, k)?;
        let hit_kmers = generate(hits, k)?;

        let total = window_count(queries, k) + window_count(hits, k);
        if let Some(budget) = self.max_kmers {
            if total > budget {
                return Err(FindError::ResourceExhausted(format!(
                    "{total} k-mers exceed in-memory budget of {budget}"
                )));
            }
        }

        let mut index: HashMap<&str, Vec<&KMer>> = HashMap::new();
        index.try_reserve(query_kmers.len()).map_err(|_| {
            FindError::ResourceExhausted(format!(
                "cannot index {} query k-mers",
                query_kmers.len()
            ))
        })?;
        for kmer in &query_kmers {
            index.entry(kmer.text.as_str()).or_default().push(kmer);
        }

        let mut pairs = Vec::new();
        for hit in &hit_kmers {
            if let Some(occurrences) = index.get(hit.text.as_str()) {
                for query in occurrences {
                    pairs.push(MatchPair::from_kmers(query, hit));
                }
            }
        }

        debug!(
            query_kmers = query_kmers.len(),
            hit_kmers = hit_kmers.len(),
            pairs = pairs.len(),
            "hash join complete"
        );
        Ok(pairs)
    }
}
