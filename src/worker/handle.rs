//! Worker process control
//!
//! Each worker runs its [`WorkerLoop`] on its own thread with its own browser
//! session. The orchestrator only ever pushes words at it.

use super::event_loop::WorkerLoop;
use super::page::{GamePage, PageError, PageLauncher};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Anything words can be handed to without waiting
pub trait WordSink {
    /// Queue one word; never blocks, never fails
    fn send_word(&self, word: &str);
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker {0} already started")]
    AlreadyRunning(usize),
    #[error("worker {id} could not open a browser session")]
    Startup {
        id: usize,
        #[source]
        source: PageError,
    },
    #[error("worker {id} thread could not be spawned")]
    Spawn {
        id: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("worker {0} thread panicked")]
    Panicked(usize),
}

/// One browser-controlling worker
pub struct Worker<L: PageLauncher> {
    id: usize,
    launcher: Arc<L>,
    sender: Sender<String>,
    receiver: Receiver<String>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    poll: Duration,
}

impl<L: PageLauncher + Sync> Worker<L> {
    pub fn new(id: usize, launcher: L, poll: Duration) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            id,
            launcher: Arc::new(launcher),
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
            poll,
        }
    }

    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Launch the worker thread and wait until its browser session is up
    ///
    /// # Errors
    ///
    /// - [`WorkerError::AlreadyRunning`] if the worker is already started
    /// - [`WorkerError::Startup`] if the browser session could not be created
    /// - [`WorkerError::Spawn`] / [`WorkerError::Panicked`] on thread failures
    pub fn start(&mut self) -> Result<(), WorkerError> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(WorkerError::AlreadyRunning(self.id));
        }

        // A previous run may have ended on its own
        if let Some(finished) = self.thread.take() {
            let _ = finished.join();
        }

        let (ready_tx, ready_rx) = bounded::<Result<(), PageError>>(1);
        let id = self.id;
        let launcher = Arc::clone(&self.launcher);
        let running = Arc::clone(&self.running);
        let queue = self.receiver.clone();
        let poll = self.poll;

        let spawned = thread::Builder::new()
            .name(format!("worker-{id}"))
            .spawn(move || {
                let page = match launcher.launch() {
                    Ok(page) => page,
                    Err(err) => {
                        running.store(false, Ordering::Release);
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                debug!(id, "worker loop started");

                let mut event_loop = WorkerLoop::new(page, queue, poll);
                event_loop.run(&running);
                event_loop.into_page().release();

                running.store(false, Ordering::Release);
                debug!(id, "worker loop finished");
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(source) => {
                self.running.store(false, Ordering::Release);
                return Err(WorkerError::Spawn { id, source });
            }
        };

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!(id, "worker started");
                self.thread = Some(handle);
                Ok(())
            }
            Ok(Err(source)) => {
                let _ = handle.join();
                warn!(id, error = %source, "worker failed to start");
                Err(WorkerError::Startup { id, source })
            }
            Err(_) => {
                self.running.store(false, Ordering::Release);
                let _ = handle.join();
                Err(WorkerError::Panicked(id))
            }
        }
    }

    /// Signal the worker to stop and wait for its thread to finish
    ///
    /// Words still queued are dropped so a later `start` begins empty.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Panicked`] if the worker thread panicked.
    pub fn close(&mut self) -> Result<(), WorkerError> {
        self.running.store(false, Ordering::Release);
        let joined = match self.thread.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked(self.id)),
            None => Ok(()),
        };

        let dropped = self.receiver.try_iter().count();
        if dropped > 0 {
            debug!(id = self.id, dropped, "queued words dropped on close");
        }
        joined
    }
}

impl<L: PageLauncher> WordSink for Worker<L> {
    fn send_word(&self, word: &str) {
        // The worker holds a receiver clone, so the channel never disconnects
        let _ = self.sender.send(word.to_string());
    }
}

impl<W: WordSink + ?Sized> WordSink for &W {
    fn send_word(&self, word: &str) {
        (**self).send_word(word);
    }
}

impl<L: PageLauncher> Drop for Worker<L> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Start every worker, stopping at the first failure
///
/// # Errors
///
/// Returns the first worker's start error.
pub fn start_all<L: PageLauncher + Sync>(workers: &mut [Worker<L>]) -> Result<(), WorkerError> {
    workers.iter_mut().try_for_each(Worker::start)
}

/// Close every worker, waiting for each thread
///
/// Every worker is closed even if an earlier one fails; the first error is
/// returned.
///
/// # Errors
///
/// Returns the first worker's close error.
pub fn close_all<L: PageLauncher + Sync>(workers: &mut [Worker<L>]) -> Result<(), WorkerError> {
    let mut first_error = None;
    for worker in workers {
        if let Err(err) = worker.close() {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}
