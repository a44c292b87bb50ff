//! Projection of a final word-count table back into a flat token stream.

use crate::table::WordCountTable;
use crate::vocab::Vocab;

/// Flattens the table into a single space-joined token stream.
///
/// End-of-word markers are stripped, each word type is repeated once per
/// unit of multiplicity, and word types are emitted in sorted token-sequence
/// order so the output is deterministic.  Original word ordering beyond
/// spacing is not recoverable; downstream consumers only read aggregate
/// statistics off this stream.
#[must_use]
pub fn flatten(table: &WordCountTable, vocab: &Vocab) -> String {
    let eow = vocab.eow();
    let mut out = String::new();
    for (word, count) in table.sorted_entries() {
        let texts: Vec<&str> = word
            .iter()
            .filter(|&&token| token != eow)
            .map(|&token| vocab.text(token))
            .collect();
        if texts.is_empty() {
            continue;
        }
        for _ in 0..count {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&texts.join(" "));
        }
    }
    out
}
