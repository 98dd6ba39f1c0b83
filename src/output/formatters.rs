//! Formatting utilities for terminal output

use crate::core::Wordlist;

/// Letters as a bracketed list, e.g. `[a, b]`
#[must_use]
pub fn format_letters(letters: &[char]) -> String {
    let joined: Vec<String> = letters.iter().map(char::to_string).collect();
    format!("[{}]", joined.join(", "))
}

/// One line per worker with the words it was handed
#[must_use]
pub fn format_assignments(wordlist: &Wordlist, workers: usize) -> Vec<String> {
    wordlist
        .partition(workers)
        .iter()
        .enumerate()
        .map(|(i, words)| format!("bot {}: {}", i + 1, format_words(words)))
        .collect()
}

/// Comma separated words, or a dash when there are none
#[must_use]
pub fn format_words<S: AsRef<str>>(words: &[S]) -> String {
    if words.is_empty() {
        return "-".to_string();
    }
    words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ")
}
