//! Offline replay of captured game traffic
//!
//! Feeds recorded websocket frames through an orchestrator whose workers
//! only record their queues. Handy for checking dispatch without a browser.

use crate::core::WebSocketMessage;
use crate::dispatch::{Orchestrator, Status};
use crate::wordsource::WordSource;
use crate::worker::WordSink;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("could not read capture: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: not a captured frame")]
    Frame {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Worker stand-in that keeps every word it is sent
#[derive(Debug, Default)]
pub struct QueueRecorder {
    words: RefCell<Vec<String>>,
}

impl QueueRecorder {
    #[must_use]
    pub fn into_words(self) -> Vec<String> {
        self.words.into_inner()
    }
}

impl WordSink for QueueRecorder {
    fn send_word(&self, word: &str) {
        self.words.borrow_mut().push(word.to_string());
    }
}

/// What a replay produced
#[derive(Debug)]
pub struct ReplaySummary {
    pub frames: usize,
    pub statuses: usize,
    /// Every word each worker was sent, in order
    pub queues: Vec<Vec<String>>,
}

/// Parse a capture file, see [`parse_frames`]
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is malformed.
pub fn load_frames<P: AsRef<Path>>(
    path: P,
    default_url: &str,
) -> Result<Vec<WebSocketMessage>, ReplayError> {
    parse_frames(&fs::read_to_string(path)?, default_url)
}

/// Parse captured frames, one per line
///
/// Lines starting with `{` are `{"url": .., "payload": ..}` objects; any
/// other non-empty line is a bare payload attributed to `default_url`.
///
/// # Errors
///
/// Returns the first line that looks like an object but does not parse.
pub fn parse_frames(content: &str, default_url: &str) -> Result<Vec<WebSocketMessage>, ReplayError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line_text = line.trim();
            if line_text.starts_with('{') {
                serde_json::from_str(line_text).map_err(|source| ReplayError::Frame {
                    line: index + 1,
                    source,
                })
            } else {
                Ok(WebSocketMessage::new(default_url, line_text))
            }
        })
        .collect()
}

/// Run `frames` through an orchestrator with `workers` recorders
pub fn run_replay<S: WordSource>(
    source: S,
    frames: &[WebSocketMessage],
    workers: usize,
    socket_prefix: &str,
    mut on_status: impl FnMut(&Status),
) -> ReplaySummary {
    let recorders = (0..workers).map(|_| QueueRecorder::default()).collect();
    let mut orchestrator = Orchestrator::new(source, recorders, socket_prefix);

    let mut statuses = 0;
    for frame in frames {
        if let Some(status) = orchestrator.handle_message(frame) {
            statuses += 1;
            on_status(&status);
        }
    }

    ReplaySummary {
        frames: frames.len(),
        statuses,
        queues: orchestrator
            .into_workers()
            .into_iter()
            .map(QueueRecorder::into_words)
            .collect(),
    }
}
