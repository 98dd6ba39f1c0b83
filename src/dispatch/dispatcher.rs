//! Wordlist computation and distribution

use crate::core::{LetterSet, Wordlist};
use crate::wordsource::WordSource;
use crate::worker::WordSink;
use tracing::{debug, warn};

/// Turns letter sets into per-worker word queues
///
/// Keeps the last computed list so checkpoints can resend it without another
/// lookup. The list is replaced wholesale on every recompute, never patched.
pub struct WordlistDispatcher<S: WordSource> {
    source: S,
    last: Wordlist,
}

impl<S: WordSource> WordlistDispatcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last: Wordlist::default(),
        }
    }

    /// Look up words for `letters` and push them to `workers`
    ///
    /// A failed lookup yields an empty list and sends nothing; the cached
    /// list is cleared either way since it belonged to the old letters.
    pub fn compute_and_distribute<W: WordSink>(
        &mut self,
        letters: &LetterSet,
        workers: &[W],
    ) -> &Wordlist {
        self.last = match self.source.lookup(letters) {
            Ok(words) => Wordlist::new(words),
            Err(err) => {
                warn!(%letters, error = %err, "word lookup unavailable");
                Wordlist::default()
            }
        };

        debug!(%letters, words = self.last.len(), "wordlist computed");
        distribute(&self.last, workers);
        &self.last
    }

    /// Resend the last computed list without a new lookup
    ///
    /// Returns `false` (and sends nothing) when there is no list to resend.
    pub fn redistribute<W: WordSink>(&self, workers: &[W]) -> bool {
        if self.last.is_empty() {
            return false;
        }
        distribute(&self.last, workers);
        true
    }

    /// Drop the cached list, e.g. at the end of a round
    pub fn clear(&mut self) {
        self.last = Wordlist::default();
    }

    #[must_use]
    pub const fn last(&self) -> &Wordlist {
        &self.last
    }
}

/// Push each worker its round-robin share, word by word
fn distribute<W: WordSink>(wordlist: &Wordlist, workers: &[W]) {
    for (worker, words) in workers.iter().zip(wordlist.partition(workers.len())) {
        for word in words {
            worker.send_word(word);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wordsource::{FixedWords, WordSourceError};
    use std::cell::{Cell, RefCell};

    /// Records every word it is sent
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) words: RefCell<Vec<String>>,
    }

    impl RecordingSink {
        pub(crate) fn take(&self) -> Vec<String> {
            self.words.take()
        }
    }

    impl WordSink for RecordingSink {
        fn send_word(&self, word: &str) {
            self.words.borrow_mut().push(word.to_string());
        }
    }

    /// Counts lookups and answers with a fixed list
    pub(crate) struct CountingSource {
        pub(crate) words: Vec<String>,
        pub(crate) calls: Cell<usize>,
    }

    impl CountingSource {
        pub(crate) fn new(words: &[&str]) -> Self {
            Self {
                words: words.iter().map(ToString::to_string).collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl WordSource for CountingSource {
        fn lookup(&self, _letters: &LetterSet) -> Result<Vec<String>, WordSourceError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.words.clone())
        }
    }

    pub(crate) struct FailingSource;

    impl WordSource for FailingSource {
        fn lookup(&self, _letters: &LetterSet) -> Result<Vec<String>, WordSourceError> {
            Err(WordSourceError::Status(500))
        }
    }

    fn letters(s: &str) -> LetterSet {
        LetterSet::new(s.chars())
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn single_worker_receives_full_list_in_order() {
        let source = FixedWords::new(words(&["slate", "tales", "least"]));
        let mut dispatcher = WordlistDispatcher::new(source);
        let workers = [RecordingSink::default()];

        let list = dispatcher.compute_and_distribute(&letters("tesla"), &workers);

        assert_eq!(list.len(), 3);
        assert_eq!(workers[0].take(), ["slate", "tales", "least"]);
    }

    #[test]
    fn words_are_spread_round_robin() {
        let source = FixedWords::new(words(&["aaaa", "bbbb", "cccc", "dddd", "eeee"]));
        let mut dispatcher = WordlistDispatcher::new(source);
        let workers = [RecordingSink::default(), RecordingSink::default()];

        dispatcher.compute_and_distribute(&letters("abcde"), &workers);

        assert_eq!(workers[0].take(), ["aaaa", "cccc", "eeee"]);
        assert_eq!(workers[1].take(), ["bbbb", "dddd"]);
    }

    #[test]
    fn short_words_never_reach_workers() {
        let source = FixedWords::new(words(&["sat", "seat", "at"]));
        let mut dispatcher = WordlistDispatcher::new(source);
        let workers = [RecordingSink::default()];

        dispatcher.compute_and_distribute(&letters("seat"), &workers);

        assert_eq!(workers[0].take(), ["seat"]);
    }

    #[test]
    fn failed_lookup_sends_nothing() {
        let mut dispatcher = WordlistDispatcher::new(FailingSource);
        let workers = [RecordingSink::default()];

        let list = dispatcher.compute_and_distribute(&letters("tesla"), &workers);

        assert!(list.is_empty());
        assert!(workers[0].take().is_empty());
        assert!(!dispatcher.redistribute(&workers));
    }

    #[test]
    fn redistribute_reuses_last_list_without_lookup() {
        let source = CountingSource::new(&["slate", "tales", "least"]);
        let mut dispatcher = WordlistDispatcher::new(&source);
        let workers = [RecordingSink::default(), RecordingSink::default()];

        dispatcher.compute_and_distribute(&letters("tesla"), &workers);
        let first: Vec<Vec<String>> = workers.iter().map(RecordingSink::take).collect();

        assert!(dispatcher.redistribute(&workers));
        let second: Vec<Vec<String>> = workers.iter().map(RecordingSink::take).collect();

        assert!(dispatcher.redistribute(&workers));
        let third: Vec<Vec<String>> = workers.iter().map(RecordingSink::take).collect();

        assert_eq!(source.calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn clear_forgets_the_list() {
        let source = FixedWords::new(words(&["slate"]));
        let mut dispatcher = WordlistDispatcher::new(source);
        let workers = [RecordingSink::default()];

        dispatcher.compute_and_distribute(&letters("tesla"), &workers);
        dispatcher.clear();

        assert!(dispatcher.last().is_empty());
        workers[0].take();
        assert!(!dispatcher.redistribute(&workers));
        assert!(workers[0].take().is_empty());
    }

    #[test]
    fn no_workers_still_caches_the_list() {
        let source = FixedWords::new(words(&["slate"]));
        let mut dispatcher = WordlistDispatcher::new(source);
        let workers: [RecordingSink; 0] = [];

        dispatcher.compute_and_distribute(&letters("tesla"), &workers);

        assert_eq!(dispatcher.last().words(), ["slate"]);
    }
}
