//! Per-worker decision loop
//!
//! For every queued word the worker re-reads the room, skips words somebody
//! already placed, and otherwise types the word. A failed submission or a
//! showing lock icon flushes the rest of the queue.

use super::page::GamePage;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

/// What happened to one queued word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Already visible in the room, not typed
    Duplicate,
    /// Typed and no lock showing, keep going
    Submitted,
    /// Typing failed or the lock showed; the queue gets flushed
    Halt,
}

/// Consumes one worker's word queue against its game page
///
/// Idle while blocked in [`step`](Self::step) on the queue; every received
/// word is attempted to completion before the next wait.
pub struct WorkerLoop<P: GamePage> {
    page: P,
    queue: Receiver<String>,
    visible: FxHashSet<String>,
    poll: Duration,
}

impl<P: GamePage> WorkerLoop<P> {
    pub fn new(page: P, queue: Receiver<String>, poll: Duration) -> Self {
        Self {
            page,
            queue,
            visible: FxHashSet::default(),
            poll,
        }
    }

    #[must_use]
    pub const fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn into_page(self) -> P {
        self.page
    }

    /// Words seen in the room at the last refresh
    #[must_use]
    pub const fn visible_words(&self) -> &FxHashSet<String> {
        &self.visible
    }

    /// Rebuild the visible-word cache from the page
    ///
    /// A page that cannot be read counts as an empty room.
    fn refresh_visible(&mut self) {
        self.visible.clear();
        match self.page.visible_words() {
            Ok(words) => self.visible.extend(words.iter().map(|w| normalize(w))),
            Err(err) => trace!(error = %err, "room not readable, assuming empty"),
        }
    }

    /// Handle one word: dedup against the room, then type it
    pub fn attempt(&mut self, word: &str) -> Attempt {
        self.refresh_visible();

        if self.visible.contains(&normalize(word)) {
            debug!(word, "already in room, skipping");
            return Attempt::Duplicate;
        }

        if let Err(err) = self.page.submit_word(word) {
            debug!(word, error = %err, "could not type word");
            return Attempt::Halt;
        }

        // Not finding the lock is the normal case
        if self.page.lock_indicator_present().unwrap_or(false) {
            debug!(word, "lock showing, likely a hit");
            return Attempt::Halt;
        }

        Attempt::Submitted
    }

    /// Drop every queued word without touching the page
    ///
    /// Returns how many words were discarded.
    pub fn flush(&mut self) -> usize {
        let dropped = self.queue.try_iter().count();
        if dropped > 0 {
            debug!(dropped, "queue flushed");
        }
        dropped
    }

    /// Wait up to one poll interval for a word and handle it
    ///
    /// Returns `None` when no word arrived (or the queue is gone).
    pub fn step(&mut self) -> Option<Attempt> {
        let word = match self.queue.recv_timeout(self.poll) {
            Ok(word) => word,
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
        };

        let attempt = self.attempt(&word);
        if attempt == Attempt::Halt {
            self.flush();
        }
        Some(attempt)
    }

    /// Keep consuming words while `active` stays set
    ///
    /// The flag is checked before every word, never in the middle of typing.
    pub fn run(&mut self, active: &AtomicBool) {
        while active.load(Ordering::Acquire) {
            self.step();
        }
    }
}

/// Lower-case and strip whitespace, the way room words are compared
fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
