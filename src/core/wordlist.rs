//! Candidate word lists and their split across workers

/// Words shorter than this never score and only flood the queues
pub const MIN_WORD_LENGTH: usize = 4;

/// Ranked candidate words for one letter set snapshot
///
/// Order is the word source's point ranking, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wordlist {
    words: Vec<String>,
}

impl Wordlist {
    /// Build a list, dropping words below [`MIN_WORD_LENGTH`]
    ///
    /// # Examples
    /// ```
    /// use wos_solver::core::Wordlist;
    ///
    /// let list = Wordlist::new(vec!["slate".into(), "sea".into(), "tale".into()]);
    /// assert_eq!(list.words(), ["slate", "tale"]);
    /// ```
    #[must_use]
    pub fn new(words: Vec<String>) -> Self {
        let words = words
            .into_iter()
            .filter(|word| word.chars().count() >= MIN_WORD_LENGTH)
            .collect();
        Self { words }
    }

    #[inline]
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Split across `workers` partitions, see [`partition`]
    #[must_use]
    pub fn partition(&self, workers: usize) -> Vec<Vec<&str>> {
        partition(&self.words, workers)
    }
}

/// Round-robin split by index
///
/// Partition `i` receives the words at indices `i, i + n, i + 2n, ...` in
/// their original order, so the top-ranked words land on different workers.
/// Returns no partitions when `workers` is zero.
///
/// # Examples
/// ```
/// use wos_solver::core::wordlist::partition;
///
/// let words = ["a", "b", "c", "d", "e"];
/// assert_eq!(partition(&words, 2), vec![vec!["a", "c", "e"], vec!["b", "d"]]);
/// ```
#[must_use]
pub fn partition<T: AsRef<str>>(words: &[T], workers: usize) -> Vec<Vec<&str>> {
    let mut parts: Vec<Vec<&str>> = vec![Vec::new(); workers];
    if workers == 0 {
        return parts;
    }

    for (index, word) in words.iter().enumerate() {
        parts[index % workers].push(word.as_ref());
    }
    parts
}
