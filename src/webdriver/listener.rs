//! Websocket capture through Chrome's performance log
//!
//! A Chrome session is opened on the game page with performance logging
//! enabled. A background thread drains the log and forwards every received
//! websocket frame, tagged with its socket url.

use super::capabilities::ChromeOptions;
use super::client::{LogEntry, WebDriver};
use crate::core::WebSocketMessage;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const PERFORMANCE_LOG: &str = "performance";

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("listener already started")]
    AlreadyRunning,
    #[error("listener could not open chrome: {0}")]
    Startup(String),
    #[error("listener thread could not be spawned")]
    Spawn(#[source] std::io::Error),
    #[error("listener thread panicked")]
    Panicked,
}

/// Captures the game's websocket traffic from a Chrome session
pub struct WsListener {
    webdriver_url: String,
    options: ChromeOptions,
    game_url: String,
    poll: Duration,
    /// Fed only by the capture thread; disconnects once it stops
    receiver: Receiver<WebSocketMessage>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WsListener {
    pub fn new(
        webdriver_url: impl Into<String>,
        options: ChromeOptions,
        game_url: impl Into<String>,
        poll: Duration,
    ) -> Self {
        // Nothing feeds this until `start`
        let (_, receiver) = unbounded();
        Self {
            webdriver_url: webdriver_url.into(),
            options,
            game_url: game_url.into(),
            poll,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Captured messages, in arrival order
    ///
    /// The channel disconnects when the capture thread stops, so take a
    /// receiver after `start`.
    #[must_use]
    pub fn messages(&self) -> Receiver<WebSocketMessage> {
        self.receiver.clone()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Open Chrome on the game and start forwarding frames
    ///
    /// # Errors
    ///
    /// Returns an error if already running or if Chrome cannot be opened.
    pub fn start(&mut self) -> Result<(), ListenerError> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(ListenerError::AlreadyRunning);
        }
        if let Some(finished) = self.thread.take() {
            let _ = finished.join();
        }

        let (ready_tx, ready_rx) = bounded::<Result<(), String>>(1);
        let url = self.webdriver_url.clone();
        let capabilities = self.options.capabilities();
        let game_url = self.game_url.clone();
        let poll = self.poll;
        let (sender, receiver) = unbounded();
        self.receiver = receiver;
        let running = Arc::clone(&self.running);

        let spawned = thread::Builder::new()
            .name("ws-listener".to_string())
            .spawn(move || {
                let driver = match WebDriver::new_session(&url, capabilities) {
                    Ok(driver) => driver,
                    Err(err) => {
                        running.store(false, Ordering::Release);
                        let _ = ready_tx.send(Err(err.to_string()));
                        return;
                    }
                };
                if let Err(err) = driver.navigate(&game_url) {
                    running.store(false, Ordering::Release);
                    let _ = ready_tx.send(Err(err.to_string()));
                    let _ = driver.quit();
                    return;
                }
                let _ = ready_tx.send(Ok(()));

                capture(&driver, &sender, &running, poll);

                if let Err(err) = driver.quit() {
                    warn!(error = %err, "could not close listener browser");
                }
                running.store(false, Ordering::Release);
            })
            .map_err(|err| {
                self.running.store(false, Ordering::Release);
                ListenerError::Spawn(err)
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!(url = %self.game_url, "listener started");
                self.thread = Some(spawned);
                Ok(())
            }
            Ok(Err(message)) => {
                let _ = spawned.join();
                Err(ListenerError::Startup(message))
            }
            Err(_) => {
                self.running.store(false, Ordering::Release);
                let _ = spawned.join();
                Err(ListenerError::Panicked)
            }
        }
    }

    /// Stop capturing and wait for the browser to close
    ///
    /// # Errors
    ///
    /// Returns an error if the listener thread panicked.
    pub fn close(&mut self) -> Result<(), ListenerError> {
        self.running.store(false, Ordering::Release);
        match self.thread.take() {
            Some(handle) => handle.join().map_err(|_| ListenerError::Panicked),
            None => Ok(()),
        }
    }
}

impl Drop for WsListener {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn capture(
    driver: &WebDriver,
    sender: &Sender<WebSocketMessage>,
    running: &AtomicBool,
    poll: Duration,
) {
    let mut tracker = FrameTracker::default();

    while running.load(Ordering::Acquire) {
        thread::sleep(poll);

        let entries = match driver.logs(PERFORMANCE_LOG) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "performance log unavailable, listener stopping");
                break;
            }
        };

        for message in entries.iter().filter_map(|entry| tracker.observe(entry)) {
            if sender.send(message).is_err() {
                debug!("nobody listening for frames");
                return;
            }
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    message: DevtoolsEvent,
}

#[derive(Deserialize)]
struct DevtoolsEvent {
    method: String,
    #[serde(default)]
    params: Value,
}

/// Maps devtools websocket events to captured messages
#[derive(Debug, Default)]
pub struct FrameTracker {
    urls: FxHashMap<String, String>,
}

impl FrameTracker {
    /// Feed one performance log entry
    ///
    /// Returns a message for received frames. Socket creation and closing
    /// only update the request id to url map; everything else is ignored.
    pub fn observe(&mut self, entry: &LogEntry) -> Option<WebSocketMessage> {
        let Envelope { message: event } = serde_json::from_str(&entry.message).ok()?;
        let params = &event.params;
        let request_id = params.get("requestId")?.as_str()?;

        match event.method.as_str() {
            "Network.webSocketCreated" => {
                let url = params.get("url")?.as_str()?;
                debug!(request_id, url, "websocket opened");
                self.urls.insert(request_id.to_string(), url.to_string());
                None
            }
            "Network.webSocketClosed" => {
                self.urls.remove(request_id);
                None
            }
            "Network.webSocketFrameReceived" => {
                let payload = params.get("response")?.get("payloadData")?.as_str()?;
                let url = self.urls.get(request_id).cloned().unwrap_or_default();
                Some(WebSocketMessage::new(url, payload))
            }
            _ => None,
        }
    }
}
