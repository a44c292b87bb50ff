//! Reversal of a single merge across a word-count table.

use crate::merges::Merge;
use crate::table::WordCountTable;

/// Expands every occurrence of the merged token back into its operand pair.
///
/// This is the structural inverse of one [`crate::apply::apply_merge`] step
/// on the same table.  It is valid on any table: every literal occurrence of
/// the merged token is expanded, including occurrences produced by later,
/// unrelated merges.  Word types without the merged token are carried over
/// unchanged, and coinciding results combine multiplicities.
#[must_use]
pub fn undo_merge(table: &WordCountTable, merge: Merge) -> WordCountTable {
    let mut next = WordCountTable::new();
    for (word, count) in table.iter() {
        if !word.contains(&merge.merged) {
            next.add(word.clone(), count);
            continue;
        }
        let mut out = Vec::with_capacity(word.len() + 1);
        for &token in word {
            if token == merge.merged {
                out.push(merge.left);
                out.push(merge.right);
            } else {
                out.push(token);
            }
        }
        next.add(out, count);
    }
    next
}
