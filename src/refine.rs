//! Greedy swap-based refinement of the applied merge list.
//!
//! The engine trades applied merges that fired rarely for excluded merges
//! whose operand pairs are frequent in the live table.  Each trial swap is an
//! undo of the low-usage merge followed by one application of the candidate,
//! so its cost is bounded by the occurrences of the affected tokens rather
//! than the corpus size.

use std::collections::VecDeque;

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::apply::apply_merge;
use crate::merges::{Merge, MergePair};
use crate::report::RefinementLogEntry;
use crate::table::WordCountTable;
use crate::undo::undo_merge;
use crate::vocab::{TokenId, Vocab};

/// Result of one refinement run.
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    /// Table after all accepted swaps.
    pub table: WordCountTable,
    /// Applied merges minus removed entries, with accepted merges appended.
    pub final_merges: Vec<Merge>,
    /// One entry per accepted swap.
    pub log: Vec<RefinementLogEntry>,
}

/// Refines the applied merge list by swapping in higher-impact excluded merges.
///
/// `applied` carries each applied merge with its recorded usage.  The *Low*
/// queue consumes applied merges ascending by usage (stable, so ties keep
/// application order); the *High* queue consumes live bigram frequencies
/// restricted to `remaining`, descending by frequency with token-id ties
/// broken ascending for determinism.
///
/// Once the *High* queue drains, refinement stops outright: trailing *Low*
/// entries are deliberately left untouched rather than drained without
/// possible counterparts.
pub fn refine(
    table: &WordCountTable,
    applied: &[(Merge, u64)],
    remaining: &[MergePair],
    vocab: &mut Vocab,
) -> RefineOutcome {
    let remaining_pairs: FxHashSet<(TokenId, TokenId)> = remaining
        .iter()
        .filter_map(|pair| {
            let left = vocab.lookup(&pair.left)?;
            let right = vocab.lookup(&pair.right)?;
            Some((left, right))
        })
        .collect();

    let mut low: VecDeque<(Merge, u64)> = {
        let mut entries: Vec<(Merge, u64)> = applied.to_vec();
        entries.sort_by_key(|&(_, usage)| usage);
        entries.into()
    };

    let mut high: VecDeque<((TokenId, TokenId), u64)> = {
        let mut entries: Vec<((TokenId, TokenId), u64)> = table
            .bigram_frequencies()
            .into_iter()
            .filter(|(pair, _)| remaining_pairs.contains(pair))
            .collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.into()
    };

    debug!(
        "refinement queues: {} applied, {} candidate bigrams",
        low.len(),
        high.len()
    );

    let mut current = table.clone();
    let mut final_merges: Vec<Merge> = applied.iter().map(|&(merge, _)| merge).collect();
    let mut log = Vec::new();

    while let Some((low_merge, low_usage)) = low.pop_front() {
        // Candidates no more frequent than the low merge's usage cannot
        // justify a swap; they can only shrink as the table evolves.
        while high.front().is_some_and(|&(_, freq)| freq <= low_usage) {
            high.pop_front();
        }
        let Some(((left, right), high_freq)) = high.pop_front() else {
            info!(
                "refinement stopped early: candidate queue drained with {} applied merges unexamined",
                low.len() + 1
            );
            break;
        };

        let merged = vocab.intern_merged(left, right);
        let high_merge = Merge {
            left,
            right,
            merged,
        };

        let candidate = undo_merge(&current, low_merge);
        let (candidate, replacements) = apply_merge(&candidate, high_merge);

        if replacements > 0 {
            if let Some(pos) = final_merges.iter().position(|&m| m == low_merge) {
                final_merges.remove(pos);
            }
            final_merges.push(high_merge);
            let entry = RefinementLogEntry {
                ordinal: log.len() + 1,
                removed: low_merge.to_pair(vocab),
                removed_usage: low_usage,
                inserted: high_merge.to_pair(vocab),
                inserted_frequency: high_freq,
                replacements,
            };
            debug!(
                "swap {}: ({}) usage={} -> ({}) freq={} replacements={}",
                entry.ordinal,
                entry.removed,
                entry.removed_usage,
                entry.inserted,
                entry.inserted_frequency,
                entry.replacements
            );
            log.push(entry);
            current = candidate;
        }
        // On rejection both merges are spent: the low merge stays applied and
        // the candidate is not retried against a different counterpart.
    }

    RefineOutcome {
        table: current,
        final_merges,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_merges;
    use crate::tokenize::tokenize_corpus;

    fn interned(pairs: &[(&str, &str)], vocab: &mut Vocab) -> Vec<Merge> {
        pairs
            .iter()
            .map(|&(a, b)| Merge::intern(&MergePair::new(a, b), vocab))
            .collect()
    }

    #[test]
    fn swaps_low_usage_merge_for_frequent_candidate() {
        // (c, d) fires once; (x, y) is adjacent four times but was excluded.
        let mut vocab = Vocab::new();
        let table = tokenize_corpus("xy xy xy xy cd", &mut vocab);
        let merges = interned(&[("c", "d")], &mut vocab);
        let outcome = apply_merges(&table, &merges, &vocab);
        let applied: Vec<(Merge, u64)> = merges
            .iter()
            .zip(&outcome.usage)
            .map(|(&m, u)| (m, u.replacements))
            .collect();
        let remaining = vec![MergePair::new("x", "y")];

        let refined = refine(&outcome.table, &applied, &remaining, &mut vocab);
        assert_eq!(refined.log.len(), 1);
        let entry = &refined.log[0];
        assert_eq!(entry.ordinal, 1);
        assert_eq!(entry.removed, MergePair::new("c", "d"));
        assert_eq!(entry.removed_usage, 1);
        assert_eq!(entry.inserted, MergePair::new("x", "y"));
        assert_eq!(entry.inserted_frequency, 4);
        assert_eq!(entry.replacements, 4);

        let final_pairs: Vec<MergePair> = refined
            .final_merges
            .iter()
            .map(|m| m.to_pair(&vocab))
            .collect();
        assert_eq!(final_pairs, vec![MergePair::new("x", "y")]);
    }

    #[test]
    fn accepted_swap_updates_corpus_size_consistently() {
        let mut vocab = Vocab::new();
        let table = tokenize_corpus("xy xy xy cd cd", &mut vocab);
        let merges = interned(&[("c", "d")], &mut vocab);
        let outcome = apply_merges(&table, &merges, &vocab);
        let applied: Vec<(Merge, u64)> = vec![(merges[0], outcome.usage[0].replacements)];
        let remaining = vec![MergePair::new("x", "y")];

        let before = outcome.table.corpus_size();
        let refined = refine(&outcome.table, &applied, &remaining, &mut vocab);
        let entry = &refined.log[0];
        // Undoing (c, d) restores its occurrences, applying (x, y) removes one
        // token per replacement.
        let undone_occurrences = 2;
        assert_eq!(
            refined.table.corpus_size(),
            before + undone_occurrences - entry.replacements
        );
        assert_eq!(refined.table.total_weight(), table.total_weight());
    }

    #[test]
    fn hard_stop_leaves_trailing_low_merges_applied() {
        // Three applied merges with low usage; the only candidate is consumed
        // by the first swap, so the other two must survive untouched.
        let mut vocab = Vocab::new();
        let table = tokenize_corpus("xy xy xy xy ab cd ef", &mut vocab);
        let merges = interned(&[("a", "b"), ("c", "d"), ("e", "f")], &mut vocab);
        let outcome = apply_merges(&table, &merges, &vocab);
        let applied: Vec<(Merge, u64)> = merges
            .iter()
            .zip(&outcome.usage)
            .map(|(&m, u)| (m, u.replacements))
            .collect();
        let remaining = vec![MergePair::new("x", "y")];

        let refined = refine(&outcome.table, &applied, &remaining, &mut vocab);
        assert_eq!(refined.log.len(), 1);
        assert_eq!(refined.final_merges.len(), 3);
        let final_pairs: Vec<MergePair> = refined
            .final_merges
            .iter()
            .map(|m| m.to_pair(&vocab))
            .collect();
        assert!(final_pairs.contains(&MergePair::new("c", "d")));
        assert!(final_pairs.contains(&MergePair::new("e", "f")));
        assert!(final_pairs.contains(&MergePair::new("x", "y")));
    }

    #[test]
    fn candidates_below_low_usage_are_discarded_not_tried() {
        // The candidate bigram occurs twice, the applied merge fired three
        // times, so the candidate cannot justify a swap and the queue drains.
        let mut vocab = Vocab::new();
        let table = tokenize_corpus("ab ab ab xy xy", &mut vocab);
        let merges = interned(&[("a", "b")], &mut vocab);
        let outcome = apply_merges(&table, &merges, &vocab);
        let applied: Vec<(Merge, u64)> = vec![(merges[0], outcome.usage[0].replacements)];
        let remaining = vec![MergePair::new("x", "y")];

        let refined = refine(&outcome.table, &applied, &remaining, &mut vocab);
        assert!(refined.log.is_empty());
        assert_eq!(refined.table, outcome.table);
        assert_eq!(refined.final_merges, merges);
    }

    #[test]
    fn no_remaining_merges_is_a_no_op() {
        let mut vocab = Vocab::new();
        let table = tokenize_corpus("ab ab", &mut vocab);
        let merges = interned(&[("a", "b")], &mut vocab);
        let outcome = apply_merges(&table, &merges, &vocab);
        let applied: Vec<(Merge, u64)> = vec![(merges[0], outcome.usage[0].replacements)];

        let refined = refine(&outcome.table, &applied, &[], &mut vocab);
        assert!(refined.log.is_empty());
        assert_eq!(refined.final_merges, merges);
    }

    #[test]
    fn weight_is_conserved_across_refinement() {
        let mut vocab = Vocab::new();
        let table = tokenize_corpus("xy xy xy cd xy cd qq", &mut vocab);
        let merges = interned(&[("c", "d"), ("q", "q")], &mut vocab);
        let outcome = apply_merges(&table, &merges, &vocab);
        let applied: Vec<(Merge, u64)> = merges
            .iter()
            .zip(&outcome.usage)
            .map(|(&m, u)| (m, u.replacements))
            .collect();
        let remaining = vec![MergePair::new("x", "y"), MergePair::new("y", "x")];

        let refined = refine(&outcome.table, &applied, &remaining, &mut vocab);
        assert_eq!(refined.table.total_weight(), table.total_weight());
    }
}
