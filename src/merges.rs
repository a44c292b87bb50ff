//! Merge rule representations at the string and interned levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AbpeError, Result};
use crate::vocab::{TokenId, Vocab};

/// A merge rule over token strings, as stored in pretrained merge tables.
///
/// The canonical external form is a single line `"left right"`; the rule
/// replaces adjacent `(left, right)` tokens with their concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergePair {
    /// Left operand token text.
    pub left: String,
    /// Right operand token text.
    pub right: String,
}

impl MergePair {
    /// Builds a pair from its two operand strings.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Parses a `"left right"` merge line with exactly two whitespace-separated fields.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(left), Some(right), None) => Ok(Self::new(left, right)),
            _ => Err(AbpeError::Format(format!(
                "merge entry {line:?} does not have exactly two whitespace-separated fields"
            ))),
        }
    }

    /// Returns the concatenated token text produced by this rule.
    #[must_use]
    pub fn merged(&self) -> String {
        format!("{}{}", self.left, self.right)
    }
}

impl fmt::Display for MergePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.left, self.right)
    }
}

/// A merge rule resolved against a [`Vocab`], ready for application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Merge {
    /// Left operand token id.
    pub left: TokenId,
    /// Right operand token id.
    pub right: TokenId,
    /// Id of the merged token `left‖right`.
    pub merged: TokenId,
}

impl Merge {
    /// Interns the pair's operands and merged token, resolving the rule.
    pub fn intern(pair: &MergePair, vocab: &mut Vocab) -> Self {
        let left = vocab.intern_atomic(&pair.left);
        let right = vocab.intern_atomic(&pair.right);
        let merged = vocab.intern_merged(left, right);
        Self {
            left,
            right,
            merged,
        }
    }

    /// Projects the rule back to its string form.
    #[must_use]
    pub fn to_pair(self, vocab: &Vocab) -> MergePair {
        MergePair::new(vocab.text(self.left), vocab.text(self.right))
    }
}
