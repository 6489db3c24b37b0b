use thiserror::Error;
use tracing::warn;

use crate::core::kmer::KmerError;
use crate::core::sequence::Sequence;
use crate::core::types::MatchPair;
use crate::matching::external::ExternalJoinFinder;
use crate::matching::hash_join::HashJoinFinder;
use crate::matching::scan::ScanFinder;

#[derive(Error, Debug)]
pub enum FindError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Kmer(#[from] KmerError),

    #[error("Spill encoding error: {0}")]
    Spill(#[from] bincode::Error),

    #[error("Automaton build failed: {0}")]
    Automaton(String),

    #[error("Out of memory: {0}")]
    ResourceExhausted(String),
}

/// The common-substring search capability.
///
/// Implementations must be observably equivalent: for the same inputs they
/// return the identical multiset of match pairs, in no guaranteed order.
pub trait CommonSubstringFinder {
    /// Find every (query k-mer, hit k-mer) pair with equal text.
    ///
    /// # Errors
    ///
    /// Returns `FindError::Kmer` for an invalid `k`, and strategy-specific
    /// IO or resource errors otherwise.
    fn find_common(
        &self,
        queries: &[Sequence],
        hits: &[Sequence],
        k: usize,
    ) -> Result<Vec<MatchPair>, FindError>;
}

/// Strategy selection policy for the caller-facing entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Try the in-memory hash join first, fall back to the external join
    /// if it reports resource exhaustion
    #[default]
    Auto,
    /// In-memory indexed hash join
    Index,
    /// Multi-pattern scan over hit sequences
    Scan,
    /// On-disk sort-merge join with bounded batches
    External,
}

/// Build a finder for the selected backend.
pub fn finder_for(backend: Backend) -> Box<dyn CommonSubstringFinder> {
    match backend {
        Backend::Auto => Box::new(FallbackFinder::new(
            Box::new(HashJoinFinder::default()),
            Box::new(ExternalJoinFinder::default()),
        )),
        Backend::Index => Box::new(HashJoinFinder::default()),
        Backend::Scan => Box::new(ScanFinder),
        Backend::External => Box::new(ExternalJoinFinder::default()),
    }
}

/// Wraps a primary in-memory strategy with an external fallback.
///
/// Resource exhaustion in the primary is recovered, not surfaced; any error
/// from the fallback itself is final.
pub struct FallbackFinder {
    primary: Box<dyn CommonSubstringFinder>,
    fallback: Box<dyn CommonSubstringFinder>,
}

impl FallbackFinder {
    pub fn new(
        primary: Box<dyn CommonSubstringFinder>,
        fallback: Box<dyn CommonSubstringFinder>,
    ) -> Self {
        Self { primary, fallback }
    }
}

impl CommonSubstringFinder for FallbackFinder {
    fn find_common(
        &self,
        queries: &[Sequence],
        hits: &[Sequence],
        k: usize,
    ) -> Result<Vec<MatchPair>, FindError> {
        match self.primary.find_common(queries, hits, k) {
            Err(FindError::ResourceExhausted(reason)) => {
                warn!(%reason, "in-memory strategy exhausted, retrying with external join");
                self.fallback.find_common(queries, hits, k)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A strategy that always reports exhaustion, for exercising fallback.
    struct AlwaysExhausted;

    impl CommonSubstringFinder for AlwaysExhausted {
        fn find_common(
            &self,
            _queries: &[Sequence],
            _hits: &[Sequence],
            _k: usize,
        ) -> Result<Vec<MatchPair>, FindError> {
            Err(FindError::ResourceExhausted("simulated".to_string()))
        }
    }

    #[test]
    fn test_fallback_recovers_exhaustion() {
        let finder = FallbackFinder::new(
            Box::new(AlwaysExhausted),
            Box::new(HashJoinFinder::default()),
        );

        let queries = vec![Sequence::new("Q", "ABCDE")];
        let hits = vec![Sequence::new("H", "XABCDEY")];
        let pairs = finder.find_common(&queries, &hits, 3).unwrap();
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_fallback_surfaces_double_failure() {
        let finder =
            FallbackFinder::new(Box::new(AlwaysExhausted), Box::new(AlwaysExhausted));

        let queries = vec![Sequence::new("Q", "ABCDE")];
        let hits = vec![Sequence::new("H", "ABCDE")];
        let err = finder.find_common(&queries, &hits, 3).unwrap_err();
        assert!(matches!(err, FindError::ResourceExhausted(_)));
    }
}
