//! Configuration controlling an adaptation run.

use serde::{Deserialize, Serialize};

use crate::error::{AbpeError, Result};

/// Configuration for adapting a pretrained merge table to a corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdaptConfig {
    /// Maximum number of pretrained merges accepted by the filter.
    pub num_merges: usize,
    /// Enables the swap-based refinement pass after application.
    pub refine: bool,
    /// Enables per-merge logging through the `log` facade.
    pub show_progress: bool,
}

impl AdaptConfig {
    /// Returns a builder initialised with [`AdaptConfig::default`].
    #[must_use]
    pub fn builder() -> AdaptBuilder {
        AdaptBuilder::default()
    }

    /// Validates the invariants required for a run.
    pub fn validate(&self) -> Result<()> {
        if self.num_merges == 0 {
            return Err(AbpeError::InvalidConfig(
                "num_merges must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AdaptConfig {
    fn default() -> Self {
        Self {
            num_merges: 1024,
            refine: true,
            show_progress: true,
        }
    }
}

/// Builder for [`AdaptConfig`].
#[derive(Debug, Default, Clone)]
pub struct AdaptBuilder {
    cfg: AdaptConfig,
}

impl AdaptBuilder {
    /// Creates a builder with [`AdaptConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested merge count.
    #[must_use]
    pub fn num_merges(mut self, value: usize) -> Self {
        self.cfg.num_merges = value;
        self
    }

    /// Enables or disables the refinement pass.
    #[must_use]
    pub fn refine(mut self, enabled: bool) -> Self {
        self.cfg.refine = enabled;
        self
    }

    /// Enables or disables per-merge logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`AdaptConfig`].
    pub fn build(self) -> Result<AdaptConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}
