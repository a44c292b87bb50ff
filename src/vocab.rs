//! Interned token vocabulary with recorded construction history.
//!
//! Tokens are immutable strings identified by a dense [`TokenId`].  Atomic
//! tokens (single characters and the end-of-word marker) have no recorded
//! origin; merged tokens remember the operand pair that produced them, which
//! makes the "two merges never collide on the same concatenation" assumption
//! observable instead of silently relied upon.

use ahash::AHashMap;
use log::warn;

/// Token identifier used throughout the crate.
pub type TokenId = u32;

/// End-of-word marker appended to every word at tokenization time.
pub const EOW: &str = "</w>";

/// Interner mapping token strings to dense identifiers.
#[derive(Debug, Clone)]
pub struct Vocab {
    texts: Vec<String>,
    index: AHashMap<String, TokenId>,
    origins: Vec<Option<(TokenId, TokenId)>>,
}

impl Default for Vocab {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocab {
    /// Creates a vocabulary containing only the end-of-word marker.
    #[must_use]
    pub fn new() -> Self {
        let mut vocab = Self {
            texts: Vec::new(),
            index: AHashMap::new(),
            origins: Vec::new(),
        };
        vocab.intern_atomic(EOW);
        vocab
    }

    /// Returns the id of the end-of-word marker.
    #[must_use]
    pub fn eow(&self) -> TokenId {
        0
    }

    /// Interns an atomic token, returning its id.
    pub fn intern_atomic(&mut self, text: &str) -> TokenId {
        if let Some(&id) = self.index.get(text) {
            return id;
        }
        self.push(text.to_owned(), None)
    }

    /// Interns the concatenation of two existing tokens as a merged token.
    ///
    /// If the concatenated string is already present under a different
    /// construction, a warning is emitted and the existing id is reused; token
    /// identity stays string-based, matching how merged tokens behave in the
    /// serialized merge-table format.
    pub fn intern_merged(&mut self, left: TokenId, right: TokenId) -> TokenId {
        let text = format!("{}{}", self.text(left), self.text(right));
        if let Some(&id) = self.index.get(&text) {
            match self.origins[id as usize] {
                Some(origin) if origin != (left, right) => {
                    warn!(
                        "ambiguous merged token {:?}: built from ({:?}, {:?}) and ({:?}, {:?})",
                        text,
                        self.text(origin.0),
                        self.text(origin.1),
                        self.text(left),
                        self.text(right),
                    );
                }
                _ => {}
            }
            return id;
        }
        self.push(text, Some((left, right)))
    }

    /// Looks up an already-interned token by its text.
    #[must_use]
    pub fn lookup(&self, text: &str) -> Option<TokenId> {
        self.index.get(text).copied()
    }

    /// Returns the text backing a token id.
    #[must_use]
    pub fn text(&self, id: TokenId) -> &str {
        &self.texts[id as usize]
    }

    /// Returns the operand pair a merged token was constructed from, or `None` for atomic tokens.
    #[must_use]
    pub fn origin(&self, id: TokenId) -> Option<(TokenId, TokenId)> {
        self.origins[id as usize]
    }

    /// Number of distinct tokens interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns `true` when only the end-of-word marker is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.len() <= 1
    }

    fn push(&mut self, text: String, origin: Option<(TokenId, TokenId)>) -> TokenId {
        let id = TokenId::try_from(self.texts.len()).expect("vocabulary exceeds u32::MAX tokens");
        self.index.insert(text.clone(), id);
        self.texts.push(text);
        self.origins.push(origin);
        id
    }
}
