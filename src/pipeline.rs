//! High-level façade wiring the filter-apply-refine pipeline.

use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::apply::apply_merges;
use crate::config::AdaptConfig;
use crate::corpus::load_corpus_text;
use crate::error::{AbpeError, Result};
use crate::filter::filter_merges;
use crate::flatten::flatten;
use crate::merges::{Merge, MergePair};
use crate::refine::refine;
use crate::report::AdaptReport;
use crate::serialization::load_pretrained_merges;
use crate::tokenize::{char_count, tokenize_corpus};
use crate::vocab::Vocab;

/// Configures and executes adaptation runs.
#[derive(Debug, Clone, Default)]
pub struct Adapter {
    cfg: AdaptConfig,
}

/// Artifacts returned after an adaptation run completes.
#[must_use]
#[derive(Debug, Clone)]
pub struct AdaptArtifacts {
    /// Flattened reconstructed corpus, one space-joined token stream.
    pub output_text: String,
    /// Final applied-merge list in replay order.
    pub final_merges: Vec<MergePair>,
    /// Structured report covering filtering, application, and refinement.
    pub report: AdaptReport,
}

impl Adapter {
    /// Creates a new adapter for the supplied configuration.
    #[must_use]
    pub fn new(cfg: AdaptConfig) -> Self {
        Self { cfg }
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &AdaptConfig {
        &self.cfg
    }

    /// Runs the pipeline over files: a `tokenizer.json` (or its directory) and a corpus.
    pub fn adapt_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        tokenizer: P,
        corpus: Q,
    ) -> Result<AdaptArtifacts> {
        let pretrained = load_pretrained_merges(tokenizer)?;
        let text = load_corpus_text(corpus)?;
        self.adapt(&text, &pretrained)
    }

    /// Runs the pipeline over in-memory inputs.
    ///
    /// Control flow: tokenize, reject empty corpora, filter the pretrained
    /// list, replay the accepted prefix, optionally refine, flatten.  All
    /// hard errors abort before any artifact is produced.
    pub fn adapt(&self, text: &str, pretrained: &[MergePair]) -> Result<AdaptArtifacts> {
        self.cfg.validate()?;
        let start = Instant::now();

        let mut vocab = Vocab::new();
        let table = tokenize_corpus(text, &mut vocab);
        let chars = char_count(text);
        if chars == 0 {
            return Err(AbpeError::EmptyCorpus(
                "corpus has no characters, compression utility is undefined".into(),
            ));
        }
        let word_types = table.word_types();
        info!(
            "corpus: {chars} chars, {word_types} word types, {} total words",
            table.total_weight()
        );

        let filtered = filter_merges(pretrained, self.cfg.num_merges);
        info!(
            "filter: accepted {} of {} pretrained merges, skipped {}",
            filtered.accepted.len(),
            pretrained.len(),
            filtered.skipped.len()
        );
        if self.cfg.show_progress {
            for skipped in &filtered.skipped {
                debug!("{skipped}");
            }
        }

        let applied: Vec<Merge> = filtered
            .accepted
            .iter()
            .map(|pair| Merge::intern(pair, &mut vocab))
            .collect();
        let applied_outcome = apply_merges(&table, &applied, &vocab);
        info!(
            "applied {} merges: corpus size {} -> {}",
            applied.len(),
            table.corpus_size(),
            applied_outcome.table.corpus_size()
        );

        let accepted_set: FxHashSet<&MergePair> = filtered.accepted.iter().collect();
        let remaining: Vec<MergePair> = pretrained
            .iter()
            .filter(|pair| !accepted_set.contains(pair))
            .cloned()
            .collect();

        let (final_table, final_merge_ids, refinement_log) = if self.cfg.refine {
            let applied_usage: Vec<(Merge, u64)> = applied
                .iter()
                .zip(&applied_outcome.usage)
                .map(|(&merge, usage)| (merge, usage.replacements))
                .collect();
            let refined = refine(&applied_outcome.table, &applied_usage, &remaining, &mut vocab);
            info!(
                "refinement: {} swaps accepted, corpus size {}",
                refined.log.len(),
                refined.table.corpus_size()
            );
            (refined.table, refined.final_merges, refined.log)
        } else {
            (applied_outcome.table, applied, Vec::new())
        };

        let output_text = flatten(&final_table, &vocab);
        let final_corpus_size = final_table.corpus_size();
        let report = AdaptReport {
            char_count: chars,
            word_types,
            initial_corpus_size: table.corpus_size(),
            final_corpus_size,
            compression_utility: AdaptReport::utility(chars, final_corpus_size),
            accepted_merges: filtered.accepted.len(),
            skipped_merges: filtered.skipped,
            merge_usage: applied_outcome.usage,
            compression_log: applied_outcome.log,
            refinement_log,
            total_duration: start.elapsed(),
        };
        let final_merges = final_merge_ids
            .iter()
            .map(|merge| merge.to_pair(&vocab))
            .collect();

        Ok(AdaptArtifacts {
            output_text,
            final_merges,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(num_merges: usize, refine: bool) -> Adapter {
        let cfg = AdaptConfig::builder()
            .num_merges(num_merges)
            .refine(refine)
            .show_progress(false)
            .build()
            .expect("valid config");
        Adapter::new(cfg)
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<MergePair> {
        raw.iter().map(|&(a, b)| MergePair::new(a, b)).collect()
    }

    #[test]
    fn usage_counts_are_weighted_by_word_multiplicity() {
        let merges = pairs(&[("a", "a"), ("a", "b")]);
        let artifacts = adapter(2, false)
            .adapt("aa ab aa", &merges)
            .expect("pipeline should run");
        assert_eq!(artifacts.report.accepted_merges, 2);
        assert_eq!(artifacts.report.merge_usage[0].replacements, 2);
        assert_eq!(artifacts.report.merge_usage[1].replacements, 1);
        assert_eq!(artifacts.final_merges, merges);
    }

    #[test]
    fn empty_corpus_is_a_hard_error() {
        let merges = pairs(&[("a", "b")]);
        let err = adapter(1, true)
            .adapt("  \n\t", &merges)
            .expect_err("empty corpus must fail");
        assert!(matches!(err, AbpeError::EmptyCorpus(_)));
    }

    #[test]
    fn unconstructible_merges_are_reported_not_fatal() {
        let merges = pairs(&[("xx", "yy")]);
        let artifacts = adapter(4, false)
            .adapt("some words here", &merges)
            .expect("soft skips never abort");
        assert_eq!(artifacts.report.accepted_merges, 0);
        assert_eq!(artifacts.report.skipped_merges.len(), 1);
        assert!(artifacts.report.skipped_merges[0].missing_left);
        assert!(artifacts.report.skipped_merges[0].missing_right);
    }

    #[test]
    fn refinement_swaps_feed_the_final_merge_list() {
        // (c, d) fires once; (x, y) is frequent but arrives after the cap.
        let merges = pairs(&[("c", "d"), ("x", "y")]);
        let artifacts = adapter(1, true)
            .adapt("xy xy xy xy cd", &merges)
            .expect("pipeline should run");
        assert_eq!(artifacts.report.refinement_log.len(), 1);
        assert_eq!(artifacts.final_merges, vec![MergePair::new("x", "y")]);
        assert!(artifacts.output_text.split(' ').any(|t| t == "xy"));
        assert!(artifacts.output_text.split(' ').any(|t| t == "c"));
    }

    #[test]
    fn compression_utility_tracks_corpus_size() {
        let merges = pairs(&[("a", "a")]);
        let artifacts = adapter(1, false)
            .adapt("aa aa aa", &merges)
            .expect("pipeline should run");
        let report = &artifacts.report;
        assert_eq!(report.char_count, 6);
        assert_eq!(report.final_corpus_size, 3);
        assert!((report.compression_utility - 0.5).abs() < f64::EPSILON);
        assert_eq!(
            artifacts.output_text.split(' ').count() as u64,
            report.final_corpus_size
        );
    }

    #[test]
    fn disabled_refinement_keeps_accepted_order() {
        let merges = pairs(&[("t", "h"), ("th", "e")]);
        let artifacts = adapter(2, false)
            .adapt("the the there", &merges)
            .expect("pipeline should run");
        assert_eq!(artifacts.final_merges, merges);
        assert!(artifacts.report.refinement_log.is_empty());
    }
}
