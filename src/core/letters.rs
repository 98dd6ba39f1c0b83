//! Letter tracking for the active round
//!
//! A `LetterSet` is the multiset of tiles on the board. `LetterState` owns the
//! authoritative set for the current round and applies the game's corrections.

use std::fmt;

/// Marker the game uses for a tile that has not been revealed yet
pub const PLACEHOLDER: char = '?';

/// Ordered multiset of board letters
///
/// Duplicates are significant. Order carries no meaning for matching but is
/// kept so corrections can remove a single occurrence by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterSet {
    letters: Vec<char>,
}

impl LetterSet {
    /// Build a set from any sequence of characters
    ///
    /// # Examples
    /// ```
    /// use wos_solver::core::LetterSet;
    ///
    /// let set = LetterSet::new("tesla".chars());
    /// assert_eq!(set.len(), 5);
    /// assert_eq!(set.to_string(), "tesla");
    /// ```
    pub fn new(letters: impl IntoIterator<Item = char>) -> Self {
        Self {
            letters: letters.into_iter().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.letters
    }

    /// Number of occurrences of `letter`
    #[must_use]
    pub fn count_of(&self, letter: char) -> usize {
        self.letters.iter().filter(|&&c| c == letter).count()
    }

    /// Number of tiles still hidden behind the placeholder
    #[must_use]
    pub fn placeholders(&self) -> usize {
        self.count_of(PLACEHOLDER)
    }

    /// Remove the first occurrence of `letter`, returning whether one was found
    fn remove_one(&mut self, letter: char) -> bool {
        match self.letters.iter().position(|&c| c == letter) {
            Some(index) => {
                self.letters.remove(index);
                true
            }
            None => false,
        }
    }

    /// Same letters regardless of order
    #[must_use]
    pub fn same_multiset(&self, other: &Self) -> bool {
        let mut a = self.letters.clone();
        let mut b = other.letters.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.letters {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Authoritative letters for the current round
///
/// `None` means no round is active. Every correction builds the next set
/// off to the side and swaps it in, so `current()` only ever sees a set
/// with the whole correction applied.
#[derive(Debug, Default)]
pub struct LetterState {
    current: Option<LetterSet>,
}

impl LetterState {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Start a new round with exactly these letters, replacing any prior round
    pub fn start_round(&mut self, letters: impl IntoIterator<Item = char>) {
        self.current = Some(LetterSet::new(letters));
    }

    /// Remove one occurrence per input letter
    ///
    /// Letters that are not on the board are skipped individually.
    /// Returns the number of letters actually removed, or `None` if no
    /// round is active.
    pub fn remove_letters(&mut self, letters: &[char]) -> Option<usize> {
        let current = self.current.as_ref()?;

        let mut next = current.clone();
        let removed = letters.iter().filter(|&&c| next.remove_one(c)).count();

        self.current = Some(next);
        Some(removed)
    }

    /// Fill hidden tiles with revealed letters, in input order
    ///
    /// Each revealed letter consumes one placeholder; once none remain the
    /// rest are dropped. The set never grows. Returns the number of
    /// placeholders filled, or `None` if no round is active.
    pub fn reveal_letters(&mut self, letters: &[char]) -> Option<usize> {
        let current = self.current.as_ref()?;

        let mut next = current.clone();
        let mut filled = 0;
        for &letter in letters {
            if !next.remove_one(PLACEHOLDER) {
                continue;
            }
            next.letters.push(letter);
            filled += 1;
        }

        self.current = Some(next);
        Some(filled)
    }

    pub fn end_round(&mut self) {
        self.current = None;
    }

    #[inline]
    #[must_use]
    pub const fn current(&self) -> Option<&LetterSet> {
        self.current.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
