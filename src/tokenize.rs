//! Character-level tokenization of raw corpus text.

use crate::table::WordCountTable;
use crate::vocab::Vocab;

/// Splits text on Unicode whitespace and counts character-level word types.
///
/// Each non-empty word becomes one token per character followed by the
/// end-of-word marker, interned through `vocab`.  An empty corpus yields an
/// empty table; downstream callers decide whether that is an error.
pub fn tokenize_corpus(text: &str, vocab: &mut Vocab) -> WordCountTable {
    let eow = vocab.eow();
    let mut table = WordCountTable::new();
    let mut buf = [0u8; 4];
    for word in text.split_whitespace() {
        let mut tokens = Vec::with_capacity(word.chars().count() + 1);
        for ch in word.chars() {
            tokens.push(vocab.intern_atomic(ch.encode_utf8(&mut buf)));
        }
        tokens.push(eow);
        table.add(tokens, 1);
    }
    table
}

/// Counts the characters of all whitespace-delimited words in `text`.
///
/// This is the character-level token baseline: whitespace itself is not
/// counted, matching the initial corpus size of a freshly tokenized table.
#[must_use]
pub fn char_count(text: &str) -> u64 {
    text.split_whitespace()
        .map(|word| word.chars().count() as u64)
        .sum()
}
