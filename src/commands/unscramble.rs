//! One-off word lookup
//!
//! Asks the word source for a letter set and returns the playable words.

use crate::core::{LetterSet, Wordlist};
use crate::wordsource::{WordSource, WordSourceError};

/// Result of unscrambling one set of letters
pub struct UnscrambleResult {
    pub letters: LetterSet,
    pub wordlist: Wordlist,
}

/// Look up the playable words for `letters`
///
/// Whitespace in the input is ignored.
///
/// # Errors
///
/// Returns the word source's error if the lookup fails.
pub fn unscramble<S: WordSource>(
    source: &S,
    letters: &str,
) -> Result<UnscrambleResult, WordSourceError> {
    let letters = LetterSet::new(letters.chars().filter(|c| !c.is_whitespace()));
    let wordlist = Wordlist::new(source.lookup(&letters)?);
    Ok(UnscrambleResult { letters, wordlist })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordsource::FixedWords;

    #[test]
    fn unscramble_filters_short_words() {
        let source = FixedWords::new(vec!["slate".into(), "let".into(), "teal".into()]);
        let result = unscramble(&source, " tes la ").unwrap();

        assert_eq!(result.letters.to_string(), "tesla");
        assert_eq!(result.wordlist.words(), ["slate", "teal"]);
    }
}
