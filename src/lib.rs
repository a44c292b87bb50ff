//! Corpus-adaptive BPE merge filtering and refinement library and CLI.
//!
//! The crate takes a pretrained byte-pair-encoding merge table and adapts it
//! to a new corpus: it validates which merges can be reconstructed bottom-up
//! from a closed vocabulary, replays a chosen prefix of them over the corpus
//! while tracking per-merge usage, and then greedily swaps underused applied
//! merges for excluded merges that are more frequent on this corpus.  The
//! swap trials operate on a weighted word-count table via undo and reapply,
//! never by rescanning the raw text.
//!
//! ```no_run
//! use abpe::{AdaptConfig, Adapter};
//!
//! # fn main() -> abpe::Result<()> {
//! let cfg = AdaptConfig::builder()
//!     .num_merges(512)
//!     .show_progress(false)
//!     .build()?;
//! let adapter = Adapter::new(cfg);
//! let artifacts = adapter.adapt_paths("tokenizer.json", "corpus.txt")?;
//! abpe::serialization::write_merge_file("final_merges.txt", &artifacts.final_merges)?;
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting
//! the library portion only can disable default features:
//! `abpe = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

pub mod apply;
pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod merges;
pub mod pipeline;
pub mod refine;
pub mod report;
pub mod serialization;
pub mod table;
pub mod tokenize;
pub mod undo;
pub mod vocab;

pub use config::{AdaptBuilder, AdaptConfig};
pub use error::{AbpeError, Result};
pub use merges::{Merge, MergePair};
pub use pipeline::{AdaptArtifacts, Adapter};
pub use report::{AdaptReport, CompressionLogEntry, MergeUsage, RefinementLogEntry};
pub use table::WordCountTable;
pub use vocab::{TokenId, Vocab, EOW};
