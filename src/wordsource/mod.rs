//! Word sources
//!
//! A word source maps a letter multiset to a point-ranked list of words.
//! The live one is an HTTP word finder; [`FixedWords`] serves a canned list.

pub mod api;

use crate::core::LetterSet;
use thiserror::Error;

pub use api::WordFinderApi;

/// Why a lookup produced no words
#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word finder request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("word finder answered with status {0}")]
    Status(u16),
    #[error("word finder response is missing `{0}`")]
    MissingField(&'static str),
    #[error("word finder response is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Something that can list candidate words for a set of letters
pub trait WordSource {
    /// Look up candidate words, best scoring first
    ///
    /// # Errors
    ///
    /// Returns an error when the source is unavailable or answers with
    /// something unexpected. Callers treat that as "no candidates yet".
    fn lookup(&self, letters: &LetterSet) -> Result<Vec<String>, WordSourceError>;
}

impl<S: WordSource + ?Sized> WordSource for &S {
    fn lookup(&self, letters: &LetterSet) -> Result<Vec<String>, WordSourceError> {
        (**self).lookup(letters)
    }
}

/// Always answers with the same words
#[derive(Debug, Clone, Default)]
pub struct FixedWords {
    words: Vec<String>,
}

impl FixedWords {
    #[must_use]
    pub const fn new(words: Vec<String>) -> Self {
        Self { words }
    }
}

impl WordSource for FixedWords {
    fn lookup(&self, _letters: &LetterSet) -> Result<Vec<String>, WordSourceError> {
        Ok(self.words.clone())
    }
}
