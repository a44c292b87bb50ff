//! Structured records describing an adaptation run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::filter::SkippedMerge;
use crate::merges::MergePair;

/// Append-only audit record for one applied merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionLogEntry {
    /// The merge that was applied.
    pub merge: MergePair,
    /// Weighted replacement count observed during this application pass.
    pub replacements: u64,
    /// Corpus token count after the pass.
    pub corpus_size: u64,
}

/// Record of one accepted refinement swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementLogEntry {
    /// 1-based ordinal of the accepted swap.
    pub ordinal: usize,
    /// Low-usage merge removed from the applied list.
    pub removed: MergePair,
    /// Usage count the removed merge had when it was applied.
    pub removed_usage: u64,
    /// Higher-impact merge appended to the applied list.
    pub inserted: MergePair,
    /// Live bigram frequency that promoted the inserted merge.
    pub inserted_frequency: u64,
    /// Weighted replacements performed by the inserted merge on the candidate table.
    pub replacements: u64,
}

/// Usage observed for one applied merge, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeUsage {
    /// The applied merge.
    pub merge: MergePair,
    /// Total weighted replacement count.
    pub replacements: u64,
}

/// Aggregate report produced by a completed adaptation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptReport {
    /// Character-level token baseline of the corpus (whitespace excluded).
    pub char_count: u64,
    /// Distinct word types in the initial table.
    pub word_types: usize,
    /// Corpus token count before any merge was applied.
    pub initial_corpus_size: u64,
    /// Corpus token count after application and refinement.
    pub final_corpus_size: u64,
    /// `(char_count - final_corpus_size) / char_count`.
    pub compression_utility: f64,
    /// Number of pretrained merges accepted by the filter.
    pub accepted_merges: usize,
    /// Pretrained merges skipped by the filter, with reasons.
    pub skipped_merges: Vec<SkippedMerge>,
    /// Per-merge usage counts in application order.
    pub merge_usage: Vec<MergeUsage>,
    /// One entry per applied merge with the corpus-size trajectory.
    pub compression_log: Vec<CompressionLogEntry>,
    /// One entry per accepted refinement swap.
    pub refinement_log: Vec<RefinementLogEntry>,
    /// Wall-clock duration of the run.
    pub total_duration: Duration,
}

impl AdaptReport {
    /// Computes the compression utility for a non-zero character baseline.
    #[must_use]
    pub fn utility(char_count: u64, final_corpus_size: u64) -> f64 {
        debug_assert!(char_count > 0, "caller must reject empty corpora first");
        (char_count as f64 - final_corpus_size as f64) / char_count as f64
    }
}
