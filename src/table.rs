//! Weighted multiset of tokenized word types.

use rustc_hash::FxHashMap;

use crate::vocab::TokenId;

/// A distinct token-sequence pattern for one whitespace-delimited word.
pub type WordType = Vec<TokenId>;

/// Mapping from word type to its corpus multiplicity.
///
/// Structurally identical sequences collapse to a single entry, weighted by
/// the number of corpus occurrences.  Merge application and undo re-key the
/// table but never change the total weight: only the grouping of words into
/// types changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCountTable {
    counts: FxHashMap<WordType, u64>,
}

impl WordCountTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` occurrences of a word type, combining with any existing entry.
    pub fn add(&mut self, word: WordType, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(word).or_insert(0) += count;
    }

    /// Iterates over `(word type, multiplicity)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&WordType, u64)> {
        self.counts.iter().map(|(word, &count)| (word, count))
    }

    /// Number of distinct word types.
    #[must_use]
    pub fn word_types(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when the table holds no word types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of multiplicities; invariant across merge and undo operations.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Total weighted token occurrences, end-of-word markers included.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.counts
            .iter()
            .map(|(word, &count)| word.len() as u64 * count)
            .sum()
    }

    /// Weighted token count excluding the one end-of-word marker each word starts with.
    ///
    /// Every replacement performed by a merge reduces this by exactly one per
    /// weighted occurrence, so the value tracks the corpus-size trajectory
    /// reported in the compression log.
    #[must_use]
    pub fn corpus_size(&self) -> u64 {
        self.total_tokens() - self.total_weight()
    }

    /// Adjacent token pair frequencies over the live table, weighted by multiplicity.
    #[must_use]
    pub fn bigram_frequencies(&self) -> FxHashMap<(TokenId, TokenId), u64> {
        let mut freqs = FxHashMap::default();
        for (word, count) in self.iter() {
            for window in word.windows(2) {
                *freqs.entry((window[0], window[1])).or_insert(0) += count;
            }
        }
        freqs
    }

    /// Sorted snapshot of the table entries, for deterministic output.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&WordType, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }
}

impl FromIterator<(WordType, u64)> for WordCountTable {
    fn from_iter<I: IntoIterator<Item = (WordType, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (word, count) in iter {
            table.add(word, count);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_combines_identical_word_types() {
        let mut table = WordCountTable::new();
        table.add(vec![1, 2, 0], 1);
        table.add(vec![1, 2, 0], 2);
        table.add(vec![3, 0], 1);
        assert_eq!(table.word_types(), 2);
        assert_eq!(table.total_weight(), 4);
        assert_eq!(table.total_tokens(), 11);
        assert_eq!(table.corpus_size(), 7);
    }

    #[test]
    fn zero_counts_are_ignored() {
        let mut table = WordCountTable::new();
        table.add(vec![1, 0], 0);
        assert!(table.is_empty());
    }

    #[test]
    fn bigram_frequencies_are_weighted() {
        let mut table = WordCountTable::new();
        table.add(vec![1, 1, 0], 2);
        table.add(vec![1, 2, 0], 1);
        let freqs = table.bigram_frequencies();
        assert_eq!(freqs.get(&(1, 1)), Some(&2));
        assert_eq!(freqs.get(&(1, 0)), Some(&2));
        assert_eq!(freqs.get(&(1, 2)), Some(&1));
        assert_eq!(freqs.get(&(2, 0)), Some(&1));
    }
}
