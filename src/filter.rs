//! Closed-vocabulary validation of pretrained merge lists.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::merges::MergePair;
use crate::vocab::EOW;

/// A pretrained merge rejected because its operands cannot be reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMerge {
    /// The rejected merge rule.
    pub pair: MergePair,
    /// `true` when the left operand was not constructible at this position.
    pub missing_left: bool,
    /// `true` when the right operand was not constructible at this position.
    pub missing_right: bool,
}

impl fmt::Display for SkippedMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) skipped:", self.pair)?;
        if self.missing_left {
            write!(f, " {:?} not constructible", self.pair.left)?;
        }
        if self.missing_right {
            write!(f, " {:?} not constructible", self.pair.right)?;
        }
        Ok(())
    }
}

/// Result of filtering a pretrained merge list against a closed vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Longest valid prefix of merges, in original order, capped at the requested count.
    pub accepted: Vec<MergePair>,
    /// Merges rejected together with which operands were missing.
    pub skipped: Vec<SkippedMerge>,
}

/// Selects the merges reconstructible bottom-up from atomic tokens.
///
/// The initial known-token set is built in one pass over the *whole* list:
/// every operand that is a single character or the end-of-word marker is
/// atomic, regardless of where in the list it appears.  Merges are then
/// walked in order; a merge is accepted when both operands are known, its
/// concatenation joins the known set, and acceptance stops at `num_merges`.
/// A request for zero merges accepts nothing.  Rejected merges are recorded
/// with per-operand diagnostics and never abort the run.
#[must_use]
pub fn filter_merges(merges: &[MergePair], num_merges: usize) -> FilterOutcome {
    if num_merges == 0 {
        return FilterOutcome::default();
    }
    let mut known: FxHashSet<String> = FxHashSet::default();
    for pair in merges {
        for operand in [&pair.left, &pair.right] {
            if operand.chars().count() == 1 || operand.as_str() == EOW {
                known.insert(operand.clone());
            }
        }
    }

    let mut outcome = FilterOutcome::default();
    for pair in merges {
        let has_left = known.contains(&pair.left);
        let has_right = known.contains(&pair.right);
        if has_left && has_right {
            known.insert(pair.merged());
            outcome.accepted.push(pair.clone());
            if outcome.accepted.len() == num_merges {
                break;
            }
        } else {
            outcome.skipped.push(SkippedMerge {
                pair: pair.clone(),
                missing_left: !has_left,
                missing_right: !has_right,
            });
        }
    }
    outcome
}
