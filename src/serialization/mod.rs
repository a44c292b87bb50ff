//! Reading and writing the flat-file formats shared with external tools.

mod huggingface;

pub use huggingface::{load_pretrained_merges, parse_merges};

use std::fs;
use std::path::Path;

use crate::error::{AbpeError, Result};
use crate::merges::MergePair;
use crate::report::AdaptReport;

/// Loads a plain merge file with one `"left right"` rule per line.
///
/// Blank lines are ignored; any other malformed line is a hard format error.
pub fn load_merge_file<P: AsRef<Path>>(path: P) -> Result<Vec<MergePair>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|err| AbpeError::io(err, Some(path.to_path_buf())))?;
    let mut pairs = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        pairs.push(MergePair::parse(line)?);
    }
    Ok(pairs)
}

/// Writes merges one per line, reusable as a drop-in replacement merge table.
pub fn write_merge_file<P: AsRef<Path>>(path: P, merges: &[MergePair]) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::new();
    for pair in merges {
        out.push_str(&pair.to_string());
        out.push('\n');
    }
    fs::write(path, out).map_err(|err| AbpeError::io(err, Some(path.to_path_buf())))
}

/// Persists the run report as pretty-printed JSON.
pub fn write_report<P: AsRef<Path>>(path: P, report: &AdaptReport) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).map_err(|err| AbpeError::io(err, Some(path.to_path_buf())))
}
