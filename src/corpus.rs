//! Corpus text loading.

use std::fs;
use std::path::Path;

use crate::error::{AbpeError, Result};

/// Reads a UTF-8 corpus file into memory.
///
/// The corpus is newline-delimited text with whitespace-separated words; the
/// whole file is held in memory because downstream tables are bounded by
/// word-type counts, not corpus length.  Emptiness is not checked here; the
/// pipeline rejects zero-character corpora once tokenized.
pub fn load_corpus_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|err| AbpeError::io(err, Some(path.to_path_buf())))
}
