//! Loading pretrained merge tables from Hugging Face `tokenizer.json` files.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{AbpeError, Result};
use crate::merges::MergePair;

/// Loads the ordered merge list from a `tokenizer.json` file.
///
/// `path` may point at the file itself or at a directory containing one.
/// The tokenizer model must be of kind `BPE` and carry a `merges` array;
/// anything else is a hard format error.  Merge entries are accepted in both
/// serialized forms: a `"left right"` string or a two-element array.
pub fn load_pretrained_merges<P: AsRef<Path>>(path: P) -> Result<Vec<MergePair>> {
    let mut path = path.as_ref().to_path_buf();
    if path.is_dir() {
        path = path.join("tokenizer.json");
    }
    let raw = fs::read_to_string(&path).map_err(|err| AbpeError::io(err, Some(path.clone())))?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|err| AbpeError::Format(format!("{}: {err}", path.display())))?;
    parse_merges(&value)
}

/// Extracts and validates the merge list from parsed tokenizer JSON.
pub fn parse_merges(value: &Value) -> Result<Vec<MergePair>> {
    let model = value
        .get("model")
        .ok_or_else(|| AbpeError::Format("tokenizer JSON has no model object".into()))?;
    match model.get("type").and_then(Value::as_str) {
        Some("BPE") => {}
        Some(other) => {
            return Err(AbpeError::Format(format!(
                "tokenizer model type is {other:?}, expected \"BPE\""
            )))
        }
        None => {
            return Err(AbpeError::Format(
                "tokenizer model has no type field".into(),
            ))
        }
    }
    let merges = model
        .get("merges")
        .and_then(Value::as_array)
        .ok_or_else(|| AbpeError::Format("tokenizer model has no merges array".into()))?;

    let mut pairs = Vec::with_capacity(merges.len());
    for entry in merges {
        pairs.push(parse_merge_entry(entry)?);
    }
    Ok(pairs)
}

fn parse_merge_entry(entry: &Value) -> Result<MergePair> {
    match entry {
        Value::String(line) => MergePair::parse(line),
        Value::Array(items) => match items.as_slice() {
            [Value::String(left), Value::String(right)] => Ok(MergePair::new(left, right)),
            _ => Err(AbpeError::Format(format!(
                "merge entry {entry} is not a pair of strings"
            ))),
        },
        _ => Err(AbpeError::Format(format!(
            "merge entry {entry} is neither a string nor an array"
        ))),
    }
}
