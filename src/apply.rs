//! Ordered merge application over a word-count table.

use log::debug;

use crate::merges::Merge;
use crate::report::{CompressionLogEntry, MergeUsage};
use crate::table::WordCountTable;
use crate::vocab::Vocab;

/// Result of replaying an ordered merge list against a table.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// Table re-keyed by the rewritten token sequences.
    pub table: WordCountTable,
    /// Weighted usage per merge, in application order.
    pub usage: Vec<MergeUsage>,
    /// Corpus-size trajectory, one entry per merge.
    pub log: Vec<CompressionLogEntry>,
}

/// Applies a single merge to every word type, returning the re-keyed table
/// and the weighted replacement count.
///
/// Scanning is left to right without overlap: a token just produced by a
/// replacement is never reconsidered as the left operand within the same
/// pass.  Sequences that coincide after rewriting have their multiplicities
/// combined.
#[must_use]
pub fn apply_merge(table: &WordCountTable, merge: Merge) -> (WordCountTable, u64) {
    let mut next = WordCountTable::new();
    let mut replacements = 0u64;
    for (word, count) in table.iter() {
        let mut out = Vec::with_capacity(word.len());
        let mut i = 0usize;
        while i < word.len() {
            if i + 1 < word.len() && word[i] == merge.left && word[i + 1] == merge.right {
                out.push(merge.merged);
                replacements += count;
                i += 2;
            } else {
                out.push(word[i]);
                i += 1;
            }
        }
        next.add(out, count);
    }
    (next, replacements)
}

/// Replays an ordered merge list, tracking per-merge usage and corpus size.
#[must_use]
pub fn apply_merges(table: &WordCountTable, merges: &[Merge], vocab: &Vocab) -> ApplyOutcome {
    let mut current = table.clone();
    let mut usage = Vec::with_capacity(merges.len());
    let mut log = Vec::with_capacity(merges.len());
    let mut corpus_size = current.corpus_size();

    for &merge in merges {
        let (next, replacements) = apply_merge(&current, merge);
        corpus_size -= replacements;
        let pair = merge.to_pair(vocab);
        debug!(
            "applied ({pair}): replacements={replacements} corpus_size={corpus_size} word_types={}",
            next.word_types()
        );
        usage.push(MergeUsage {
            merge: pair.clone(),
            replacements,
        });
        log.push(CompressionLogEntry {
            merge: pair,
            replacements,
            corpus_size,
        });
        current = next;
    }

    ApplyOutcome {
        table: current,
        usage,
        log,
    }
}
