//! Game event handling
//!
//! The orchestrator is the single writer of the round state. It turns game
//! events into letter corrections and wordlist dispatches, and reports what
//! it did as [`Status`] updates.

use super::WordlistDispatcher;
use crate::core::{GameEvent, LetterSet, LetterState, WebSocketMessage, Wordlist};
use crate::wordsource::WordSource;
use crate::worker::WordSink;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Whether a round is currently being played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    NoRound,
    RoundActive,
}

/// Something worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    RoundStarted {
        level: Option<u32>,
        letters: LetterSet,
        wordlist: Wordlist,
    },
    LettersRemoved {
        removed: Vec<char>,
        letters: LetterSet,
        wordlist: Wordlist,
    },
    LettersRevealed {
        revealed: Vec<char>,
        letters: LetterSet,
        wordlist: Wordlist,
    },
    MarkReached {
        mark: i64,
        wordlist: Wordlist,
    },
    RoundEnded,
}

/// Drives one letter state, one dispatcher and the worker pool
pub struct Orchestrator<S: WordSource, W: WordSink> {
    letters: LetterState,
    dispatcher: WordlistDispatcher<S>,
    workers: Vec<W>,
    socket_prefix: String,
}

impl<S: WordSource, W: WordSink> Orchestrator<S, W> {
    /// Create an orchestrator feeding `workers`
    ///
    /// Only websocket messages whose url starts with `socket_prefix` are
    /// treated as game traffic.
    pub fn new(source: S, workers: Vec<W>, socket_prefix: impl Into<String>) -> Self {
        Self {
            letters: LetterState::new(),
            dispatcher: WordlistDispatcher::new(source),
            workers,
            socket_prefix: socket_prefix.into(),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> RoundPhase {
        if self.letters.is_active() {
            RoundPhase::RoundActive
        } else {
            RoundPhase::NoRound
        }
    }

    #[must_use]
    pub const fn letters(&self) -> Option<&LetterSet> {
        self.letters.current()
    }

    #[must_use]
    pub const fn wordlist(&self) -> &Wordlist {
        self.dispatcher.last()
    }

    #[must_use]
    pub fn workers(&self) -> &[W] {
        &self.workers
    }

    /// Give the workers back, e.g. to close them
    #[must_use]
    pub fn into_workers(self) -> Vec<W> {
        self.workers
    }

    /// Decode and handle one captured websocket message
    ///
    /// Messages from other sockets and frames that are not game packets are
    /// ignored.
    pub fn handle_message(&mut self, message: &WebSocketMessage) -> Option<Status> {
        if !message.url.starts_with(&self.socket_prefix) {
            return None;
        }
        let event = GameEvent::from_payload(&message.payload)?;
        self.handle_event(event)
    }

    /// Apply one game event
    ///
    /// Corrections and checkpoints outside a round are no-ops, as is a
    /// checkpoint with no wordlist to resend.
    pub fn handle_event(&mut self, event: GameEvent) -> Option<Status> {
        debug!(kind = event.kind(), phase = ?self.phase(), "game event");

        match event {
            GameEvent::NewLevel { level, letters } => {
                self.letters.start_round(letters);
                let (letters, wordlist) = self.recompute()?;
                info!(?level, %letters, words = wordlist.len(), "level started");
                Some(Status::RoundStarted {
                    level,
                    letters,
                    wordlist,
                })
            }
            GameEvent::FalseLetters(removed) => {
                self.letters.remove_letters(&removed)?;
                let (letters, wordlist) = self.recompute()?;
                info!(%letters, words = wordlist.len(), "false letters removed");
                Some(Status::LettersRemoved {
                    removed,
                    letters,
                    wordlist,
                })
            }
            GameEvent::HiddenLetters(revealed) => {
                self.letters.reveal_letters(&revealed)?;
                let (letters, wordlist) = self.recompute()?;
                info!(%letters, words = wordlist.len(), "hidden letters revealed");
                Some(Status::LettersRevealed {
                    revealed,
                    letters,
                    wordlist,
                })
            }
            GameEvent::Marks(reached, base) => {
                if !self.letters.is_active() || !self.dispatcher.redistribute(&self.workers) {
                    return None;
                }
                let mark = reached - base;
                info!(mark, "mark reached, wordlist resent");
                Some(Status::MarkReached {
                    mark,
                    wordlist: self.dispatcher.last().clone(),
                })
            }
            GameEvent::Ranking => {
                self.letters.end_round();
                self.dispatcher.clear();
                info!("level ended");
                Some(Status::RoundEnded)
            }
        }
    }

    /// Consume messages until `active` clears or the channel closes
    ///
    /// Every status update is handed to `on_status`.
    pub fn run(
        &mut self,
        messages: &Receiver<WebSocketMessage>,
        active: &AtomicBool,
        poll: Duration,
        mut on_status: impl FnMut(&Status),
    ) {
        while active.load(Ordering::Acquire) {
            let message = match messages.recv_timeout(poll) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("message channel closed");
                    break;
                }
            };

            if let Some(status) = self.handle_message(&message) {
                on_status(&status);
            }
        }
    }

    fn recompute(&mut self) -> Option<(LetterSet, Wordlist)> {
        let letters = self.letters.current()?.clone();
        let wordlist = self
            .dispatcher
            .compute_and_distribute(&letters, &self.workers)
            .clone();
        Some((letters, wordlist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatcher::tests::{CountingSource, FailingSource, RecordingSink};
    use crossbeam_channel::unbounded;

    const SOCKET: &str = "wss://wos2.gartic.es/socket.io";

    fn orchestrator(
        source: &CountingSource,
        workers: usize,
    ) -> Orchestrator<&CountingSource, RecordingSink> {
        let sinks = (0..workers).map(|_| RecordingSink::default()).collect();
        Orchestrator::new(source, sinks, SOCKET)
    }

    fn new_level(letters: &str) -> GameEvent {
        GameEvent::NewLevel {
            level: Some(1),
            letters: letters.chars().collect(),
        }
    }

    fn queued(orch: &Orchestrator<&CountingSource, RecordingSink>) -> Vec<Vec<String>> {
        orch.workers().iter().map(RecordingSink::take).collect()
    }

    #[test]
    fn new_level_dispatches_to_single_worker() {
        let source = CountingSource::new(&["slate", "tales", "least"]);
        let mut orch = orchestrator(&source, 1);

        let status = orch.handle_event(new_level("tesla"));

        assert!(matches!(status, Some(Status::RoundStarted { level: Some(1), .. })));
        assert_eq!(orch.phase(), RoundPhase::RoundActive);
        assert_eq!(queued(&orch), [["slate", "tales", "least"]]);
    }

    #[test]
    fn false_letters_remove_once_and_recompute() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 1);
        orch.handle_event(new_level("tesla"));

        orch.handle_event(GameEvent::FalseLetters(vec!['a']));
        assert_eq!(orch.letters().unwrap().to_string(), "tesl");

        orch.handle_event(GameEvent::FalseLetters(vec!['a']));
        assert_eq!(orch.letters().unwrap().to_string(), "tesl");
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn hidden_letters_fill_placeholders() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 2);
        orch.handle_event(new_level("te?la"));

        let status = orch.handle_event(GameEvent::HiddenLetters(vec!['s']));

        let Some(Status::LettersRevealed { letters, .. }) = &status else {
            panic!("expected a reveal status, got {status:?}");
        };
        assert!(letters.same_multiset(&LetterSet::new("tesla".chars())));
    }

    #[test]
    fn corrections_without_round_are_ignored() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 1);

        assert_eq!(orch.handle_event(GameEvent::FalseLetters(vec!['a'])), None);
        assert_eq!(orch.handle_event(GameEvent::HiddenLetters(vec!['a'])), None);
        assert_eq!(orch.handle_event(GameEvent::Marks(5, 1)), None);
        assert_eq!(source.calls.get(), 0);
        assert_eq!(orch.phase(), RoundPhase::NoRound);
    }

    #[test]
    fn checkpoint_resends_without_lookup() {
        let source = CountingSource::new(&["slate", "tales", "least"]);
        let mut orch = orchestrator(&source, 2);
        orch.handle_event(new_level("tesla"));
        let first = queued(&orch);

        let status = orch.handle_event(GameEvent::Marks(10, 4));

        assert!(matches!(status, Some(Status::MarkReached { mark: 6, .. })));
        assert_eq!(queued(&orch), first);
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn checkpoint_without_wordlist_is_ignored() {
        let mut orch = Orchestrator::new(FailingSource, vec![RecordingSink::default()], SOCKET);
        orch.handle_event(new_level("tesla"));

        assert_eq!(orch.handle_event(GameEvent::Marks(3, 1)), None);
        assert!(orch.workers()[0].take().is_empty());
    }

    #[test]
    fn ranking_ends_round_and_disables_checkpoint() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 1);
        orch.handle_event(new_level("tesla"));
        queued(&orch);

        assert_eq!(orch.handle_event(GameEvent::Ranking), Some(Status::RoundEnded));
        assert!(orch.letters().is_none());
        assert!(orch.wordlist().is_empty());

        assert_eq!(orch.handle_event(GameEvent::Marks(5, 1)), None);
        assert_eq!(queued(&orch), [Vec::<String>::new()]);
    }

    #[test]
    fn ranking_without_round_still_reports_end() {
        let source = CountingSource::new(&[]);
        let mut orch = orchestrator(&source, 1);
        assert_eq!(orch.handle_event(GameEvent::Ranking), Some(Status::RoundEnded));
    }

    #[test]
    fn messages_from_other_sockets_are_ignored() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 1);
        let payload = r#"42["game",0,{"level":1,"letters":["t","e","s","l","a"]}]"#;

        let other = WebSocketMessage::new("wss://chat.example/socket", payload);
        assert_eq!(orch.handle_message(&other), None);

        let game = WebSocketMessage::new(format!("{SOCKET}/?EIO=4"), payload);
        assert!(orch.handle_message(&game).is_some());
    }

    #[test]
    fn string_level_still_opens_the_round() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 1);
        let start = r#"42["game",0,{"level":"3","letters":["t","e","s","l","a"]}]"#;
        let correction = r#"42["game",0,{"falseLetters":["a"]}]"#;

        let status = orch.handle_message(&WebSocketMessage::new(SOCKET, start));
        assert!(matches!(status, Some(Status::RoundStarted { level: Some(3), .. })));

        assert!(orch.handle_message(&WebSocketMessage::new(SOCKET, correction)).is_some());
        assert_eq!(orch.letters().unwrap().to_string(), "tesl");
    }

    #[test]
    fn run_stops_when_channel_closes() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 1);
        let (tx, rx) = unbounded();
        tx.send(WebSocketMessage::new(
            SOCKET,
            r#"42["game",0,{"level":2,"letters":["t","e","s","l","a"]}]"#,
        ))
        .unwrap();
        tx.send(WebSocketMessage::new(SOCKET, r#"42["game",0,{"ranking":[]}]"#))
            .unwrap();
        drop(tx);

        let active = AtomicBool::new(true);
        let mut statuses = Vec::new();
        orch.run(&rx, &active, Duration::from_millis(1), |s| {
            statuses.push(s.clone());
        });

        assert_eq!(statuses.len(), 2);
        assert!(matches!(statuses[0], Status::RoundStarted { level: Some(2), .. }));
        assert_eq!(statuses[1], Status::RoundEnded);
    }

    #[test]
    fn run_returns_immediately_when_inactive() {
        let source = CountingSource::new(&["slate"]);
        let mut orch = orchestrator(&source, 1);
        let (_tx, rx) = unbounded();
        let active = AtomicBool::new(false);

        orch.run(&rx, &active, Duration::from_millis(1), |_| {
            panic!("no status expected");
        });
    }
}
