use std::collections::HashMap;

use tracing::debug;

use crate::annotate::accession::normalize_accession;
use crate::core::epitope::ReferenceEpitope;
use crate::core::types::{AnnotatedMatch, StitchedMatch};

/// Interval columns for one identifier group. Parallel arrays so the
/// containment and overlap tests reduce to one zip pass each.
#[derive(Debug, Default)]
struct IntervalGroup {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

/// Annotates stitched matches against a reference table.
///
/// Construction groups the table once: reference names for the substring
/// pass, row counts and interval arrays per normalized identifier. The
/// engine is then reusable across batches.
pub struct AnnotationEngine {
    names: Vec<String>,
    id_counts: HashMap<String, usize>,
    intervals: HashMap<String, IntervalGroup>,
}

impl AnnotationEngine {
    pub fn new(records: &[ReferenceEpitope]) -> Self {
        let mut id_counts: HashMap<String, usize> = HashMap::new();
        let mut intervals: HashMap<String, IntervalGroup> = HashMap::new();
        let mut names = Vec::with_capacity(records.len());

        for record in records {
            let id = normalize_accession(&record.identifier);
            *id_counts.entry(id.clone()).or_default() += 1;

            // Rows with malformed positions count toward the identifier
            // statistics but stay out of the interval arrays.
            if let (Some(start), Some(end)) = (record.start, record.end) {
                let group = intervals.entry(id).or_default();
                group.starts.push(start);
                group.ends.push(end);
            }

            names.push(record.name.clone());
        }

        Self {
            names,
            id_counts,
            intervals,
        }
    }

    /// Number of reference rows the engine was built from
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Annotate a batch, preserving cardinality and order.
    ///
    /// A match whose hit identifier has no reference rows gets all four
    /// counters zero; that is expected, not an error.
    pub fn annotate(&self, matches: Vec<StitchedMatch>) -> Vec<AnnotatedMatch> {
        let motif_counts = self.substring_counts(&matches);

        let annotated: Vec<AnnotatedMatch> = matches
            .into_iter()
            .map(|motif| {
                let hit_id = normalize_accession(&motif.hit_protein);
                let substring_count =
                    motif_counts.get(motif.merged_text.as_str()).copied().unwrap_or(0);
                let reference_data_count = self.id_counts.get(&hit_id).copied().unwrap_or(0);
                let (fully_contained_count, partial_overlap_count) =
                    self.interval_counts(&hit_id, motif.hit_start, motif.hit_end);

                AnnotatedMatch {
                    motif,
                    substring_count,
                    reference_data_count,
                    fully_contained_count,
                    partial_overlap_count,
                }
            })
            .collect();

        debug!(matches = annotated.len(), "annotated batch");
        annotated
    }

    fn interval_counts(&self, hit_id: &str, hit_start: usize, hit_end: usize) -> (usize, usize) {
        let Some(group) = self.intervals.get(hit_id) else {
            return (0, 0);
        };

        let mut fully = 0;
        let mut partial = 0;
        for (&start, &end) in group.starts.iter().zip(&group.ends) {
            if start <= hit_start && end >= hit_end {
                fully += 1;
            }
            if !(end < hit_start || start > hit_end) {
                partial += 1;
            }
        }
        (fully, partial)
    }

    /// Count, for every distinct motif in the batch, the reference rows
    /// whose name contains it. One multi-pattern pass over all names; each
    /// row counts at most once per motif no matter how often the motif
    /// occurs inside it.
    fn substring_counts(&self, matches: &[StitchedMatch]) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for m in matches {
            counts.entry(m.merged_text.clone()).or_insert(0);
        }
        if counts.is_empty() {
            return counts;
        }

        let motifs: Vec<String> = counts.keys().cloned().collect();
        self.count_containing_names(&motifs, &mut counts);
        counts
    }

    #[cfg(feature = "automaton")]
    fn count_containing_names(&self, motifs: &[String], counts: &mut HashMap<String, usize>) {
        use std::collections::HashSet;

        let automaton = match aho_corasick::AhoCorasick::new(motifs) {
            Ok(a) => a,
            Err(e) => {
                // Motifs come from stitching, so pattern construction only
                // fails on pathological inputs; the scan fallback still
                // produces correct counts.
                tracing::warn!(error = %e, "automaton build failed, using direct scan");
                self.count_containing_names_direct(motifs, counts);
                return;
            }
        };

        for name in &self.names {
            let mut seen: HashSet<usize> = HashSet::new();
            for mat in automaton.find_overlapping_iter(name) {
                seen.insert(mat.pattern().as_usize());
            }
            for idx in seen {
                if let Some(count) = counts.get_mut(motifs[idx].as_str()) {
                    *count += 1;
                }
            }
        }
    }

    #[cfg(not(feature = "automaton"))]
    fn count_containing_names(&self, motifs: &[String], counts: &mut HashMap<String, usize>) {
        self.count_containing_names_direct(motifs, counts);
    }

    fn count_containing_names_direct(&self, motifs: &[String], counts: &mut HashMap<String, usize>) {
        for motif in motifs {
            let n = self.names.iter().filter(|name| name.contains(motif)).count();
            if let Some(count) = counts.get_mut(motif.as_str()) {
                *count = n;
            }
        }
    }
}
