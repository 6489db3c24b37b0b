//! External indexed join: bounded-memory common-substring search.
//!
//! Both k-mer sets are spilled to disk as sorted runs of at most
//! `batch_size` records each, then joined with a k-way merge on each side
//! feeding a sort-merge equality join keyed by k-mer text (`k` is constant
//! per invocation, so the text alone is the join key). Peak memory is
//! bounded by the batch size plus the size of one equal-text group per
//! side, regardless of input size.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::kmer::{windows, KmerError};
use crate::core::sequence::Sequence;
use crate::core::types::MatchPair;
use crate::matching::finder::{CommonSubstringFinder, FindError};
use crate::utils::validation::check_k;

/// Insert batching bound: one sorted run holds at most this many records.
pub const DEFAULT_BATCH_SIZE: usize = 50_000;

/// On-disk record: the k-mer text plus a reference back into the side's
/// sequence slice. Ordering is by text first, which is what both the run
/// sort and the merge join key on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct SpillRow {
    text: String,
    seq: u32,
    start: u32,
}

/// Common-substring search that never holds a full k-mer set in memory.
#[derive(Debug)]
pub struct ExternalJoinFinder {
    /// Records per sorted run
    pub batch_size: usize,

    /// Directory for spill files; `None` uses the system temp directory.
    /// Spill files are removed when the join finishes.
    pub spill_dir: Option<PathBuf>,
}

impl Default for ExternalJoinFinder {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            spill_dir: None,
        }
    }
}

impl ExternalJoinFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            spill_dir: None,
        }
    }
}

/// Sort a batch and write it out as one run file.
fn write_run(
    dir: &Path,
    tag: &str,
    index: usize,
    batch: &mut Vec<SpillRow>,
) -> Result<PathBuf, FindError> {
    batch.sort_unstable();

    let path = dir.join(format!("{tag}-{index:04}.run"));
    let mut writer = BufWriter::new(File::create(&path)?);
    for row in batch.drain(..) {
        bincode::serialize_into(&mut writer, &row)?;
    }
    writer.flush()?;
    Ok(path)
}

/// Stream one side's k-mers into sorted runs of at most `batch_size` rows.
fn spill_side(
    sequences: &[Sequence],
    k: usize,
    dir: &Path,
    tag: &str,
    batch_size: usize,
) -> Result<Vec<PathBuf>, FindError> {
    let mut runs = Vec::new();
    let mut batch: Vec<SpillRow> = Vec::with_capacity(batch_size);

    for (seq_idx, seq) in sequences.iter().enumerate() {
        for (start, text) in windows(seq, k) {
            batch.push(SpillRow {
                text: text.to_string(),
                seq: seq_idx as u32,
                start: start as u32,
            });
            if batch.len() >= batch_size {
                runs.push(write_run(dir, tag, runs.len(), &mut batch)?);
            }
        }
    }
    if !batch.is_empty() {
        runs.push(write_run(dir, tag, runs.len(), &mut batch)?);
    }
    Ok(runs)
}

/// Sequential reader over one run file.
struct RunCursor {
    reader: BufReader<File>,
}

impl RunCursor {
    fn open(path: &Path) -> Result<Self, FindError> {
        Ok(Self {
            reader: BufReader::new(File::open(path)?),
        })
    }

    fn read_next(&mut self) -> Result<Option<SpillRow>, FindError> {
        match bincode::deserialize_from(&mut self.reader) {
            Ok(row) => Ok(Some(row)),
            Err(e) => match *e {
                bincode::ErrorKind::Io(ref io) if io.kind() == ErrorKind::UnexpectedEof => Ok(None),
                _ => Err(FindError::Spill(e)),
            },
        }
    }
}

/// K-way merge over a side's sorted runs, yielding rows in text order.
struct MergedRuns {
    cursors: Vec<RunCursor>,
    heap: BinaryHeap<Reverse<(SpillRow, usize)>>,
}

impl MergedRuns {
    fn open(runs: &[PathBuf]) -> Result<Self, FindError> {
        let mut cursors = Vec::with_capacity(runs.len());
        let mut heap = BinaryHeap::with_capacity(runs.len());
        for (idx, path) in runs.iter().enumerate() {
            let mut cursor = RunCursor::open(path)?;
            if let Some(row) = cursor.read_next()? {
                heap.push(Reverse((row, idx)));
            }
            cursors.push(cursor);
        }
        Ok(Self { cursors, heap })
    }

    fn next_row(&mut self) -> Result<Option<SpillRow>, FindError> {
        let Some(Reverse((row, idx))) = self.heap.pop() else {
            return Ok(None);
        };
        if let Some(next) = self.cursors[idx].read_next()? {
            self.heap.push(Reverse((next, idx)));
        }
        Ok(Some(row))
    }
}

/// Groups a merged stream into runs of equal text.
struct GroupedRows {
    merged: MergedRuns,
    pending: Option<SpillRow>,
}

impl GroupedRows {
    fn new(merged: MergedRuns) -> Self {
        Self {
            merged,
            pending: None,
        }
    }

    fn next_group(&mut self) -> Result<Option<(String, Vec<SpillRow>)>, FindError> {
        let first = match self.pending.take() {
            Some(row) => row,
            None => match self.merged.next_row()? {
                Some(row) => row,
                None => return Ok(None),
            },
        };

        let text = first.text.clone();
        let mut rows = vec![first];
        loop {
            match self.merged.next_row()? {
                Some(row) if row.text == text => rows.push(row),
                Some(row) => {
                    self.pending = Some(row);
                    break;
                }
                None => break,
            }
        }
        Ok(Some((text, rows)))
    }
}

impl CommonSubstringFinder for ExternalJoinFinder {
    fn find_common(
        &self,
        queries: &[Sequence],
        hits: &[Sequence],
        k: usize,
    ) -> Result<Vec<MatchPair>, FindError> {
        if let Some(msg) = check_k(k) {
            return Err(FindError::Kmer(KmerError::InvalidParameter(msg)));
        }

        let spill = match &self.spill_dir {
            Some(dir) => tempfile::tempdir_in(dir)?,
            None => tempfile::tempdir()?,
        };

        let query_runs = spill_side(queries, k, spill.path(), "query", self.batch_size)?;
        let hit_runs = spill_side(hits, k, spill.path(), "hit", self.batch_size)?;
        debug!(
            query_runs = query_runs.len(),
            hit_runs = hit_runs.len(),
            batch_size = self.batch_size,
            "spilled k-mer runs"
        );

        let mut query_groups = GroupedRows::new(MergedRuns::open(&query_runs)?);
        let mut hit_groups = GroupedRows::new(MergedRuns::open(&hit_runs)?);

        let mut pairs = Vec::new();
        let mut qg = query_groups.next_group()?;
        let mut hg = hit_groups.next_group()?;

        loop {
            let order = match (&qg, &hg) {
                (Some((qt, _)), Some((ht, _))) => qt.cmp(ht),
                _ => break,
            };
            match order {
                Ordering::Less => qg = query_groups.next_group()?,
                Ordering::Greater => hg = hit_groups.next_group()?,
                Ordering::Equal => {
                    if let (Some((text, qrows)), Some((_, hrows))) = (&qg, &hg) {
                        for qr in qrows {
                            let query = &queries[qr.seq as usize];
                            for hr in hrows {
                                let hit = &hits[hr.seq as usize];
                                pairs.push(MatchPair {
                                    text: text.clone(),
                                    query_protein: query.name.clone(),
                                    query_length: query.len(),
                                    query_start: qr.start as usize,
                                    query_end: qr.start as usize + k - 1,
                                    hit_protein: hit.name.clone(),
                                    hit_length: hit.len(),
                                    hit_start: hr.start as usize,
                                    hit_end: hr.start as usize + k - 1,
                                    k,
                                });
                            }
                        }
                    }
                    qg = query_groups.next_group()?;
                    hg = hit_groups.next_group()?;
                }
            }
        }

        debug!(pairs = pairs.len(), "external join complete");
        Ok(pairs)
    }
}
