//! Common-substring search and match stitching.
//!
//! This module provides the core matching functionality:
//!
//! - [`CommonSubstringFinder`]: the one polymorphic capability — given a
//!   query sequence set, a hit sequence set, and `k`, return every pair of
//!   equal k-mers. Three interchangeable strategies implement it:
//!
//!   1. [`HashJoinFinder`](hash_join::HashJoinFinder): builds an in-memory
//!      index keyed by k-mer text over the query side and probes it with
//!      the hit side. Memory-bound by total k-mer count; fastest for
//!      small and medium inputs.
//!   2. [`ScanFinder`](scan::ScanFinder): builds one multi-pattern matcher
//!      over all distinct query k-mers and scans each hit sequence once.
//!      Cost is proportional to hit sequence length, not hit k-mer count,
//!      so it wins when the hit set is large and queries are few.
//!   3. [`ExternalJoinFinder`](external::ExternalJoinFinder): spills both
//!      k-mer sets to sorted on-disk runs in bounded batches and performs
//!      a sort-merge equality join. Peak memory stays constant regardless
//!      of input size; this is the graceful degrade path.
//!
//!   All three return the identical multiset of match pairs; only
//!   resource profiles differ. Selection is the caller's policy — see
//!   [`FallbackFinder`](finder::FallbackFinder), which retries a
//!   resource-exhausted in-memory strategy against the external one.
//!
//! - [`stitch`](stitch::stitch): merges runs of position-synchronized
//!   adjacent pairs (+1 on both sides per step) into maximal contiguous
//!   matches. This is not a general longest-common-substring algorithm;
//!   it only extends matches already delivered in lock-step.

pub mod external;
pub mod finder;
pub mod hash_join;
pub mod scan;
pub mod stitch;

pub use finder::{Backend, CommonSubstringFinder, FallbackFinder, FindError};
