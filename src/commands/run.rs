//! Live play
//!
//! Starts the websocket listener and the bot pool, then lets the
//! orchestrator react to the game until the user presses Enter.

use crate::config::GameConfig;
use crate::dispatch::{Orchestrator, Status};
use crate::webdriver::{ChromeOptions, FirefoxLauncher, FirefoxOptions, WindowSize, WsListener};
use crate::wordsource::WordFinderApi;
use crate::worker::{Worker, close_all};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Everything needed for a live session
pub struct RunConfig {
    pub game: GameConfig,
    pub chromedriver_url: String,
    pub chrome: ChromeOptions,
    /// Geckodriver host; bot `i` talks to `geckodriver_port + i`
    pub geckodriver_host: String,
    pub geckodriver_port: u16,
    /// One bot per profile
    pub firefox_profiles: Vec<PathBuf>,
    pub headless_bots: bool,
    pub window: WindowSize,
    pub wordfinder_url: String,
}

impl RunConfig {
    /// Driver url for the bot at `index`
    ///
    /// Geckodriver serves one session per process, so every bot gets its own
    /// port.
    #[must_use]
    pub fn geckodriver_url(&self, index: usize) -> String {
        let port = usize::from(self.geckodriver_port) + index;
        format!("{}:{port}", self.geckodriver_host.trim_end_matches('/'))
    }

    fn launcher(&self, index: usize, profile: &Path) -> FirefoxLauncher {
        let options = FirefoxOptions {
            profile: Some(profile.to_path_buf()),
            headless: self.headless_bots,
            window: self.window,
            private_mode: false,
        };
        FirefoxLauncher::new(self.geckodriver_url(index), options, self.game.clone())
    }
}

/// Run a live session until Enter is pressed
///
/// Bots that fail to start are reported and left out; the session goes on
/// with the rest.
///
/// # Errors
///
/// Returns an error if the word finder client or the listener cannot be
/// set up, or if a worker thread panicked.
pub fn run_live(config: &RunConfig, mut on_status: impl FnMut(&Status, usize)) -> Result<()> {
    let source = WordFinderApi::new(&config.wordfinder_url).context("building word finder client")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner.set_message("Opening websocket listener...");
    let mut listener = WsListener::new(
        &config.chromedriver_url,
        config.chrome.clone(),
        &config.game.game_url,
        config.game.poll_interval,
    );
    if let Err(err) = listener.start() {
        spinner.finish_and_clear();
        return Err(err).context("starting websocket listener");
    }

    let mut workers = Vec::with_capacity(config.firefox_profiles.len());
    for (index, profile) in config.firefox_profiles.iter().enumerate() {
        spinner.set_message(format!("Starting bot {} ({})...", index + 1, profile.display()));
        let mut worker = Worker::new(index, config.launcher(index, profile), config.game.poll_interval);
        match worker.start() {
            Ok(()) => workers.push(worker),
            Err(err) => warn!(error = %err, profile = %profile.display(), "bot left out"),
        }
    }
    spinner.finish_with_message(format!(
        "Listening with {} of {} bot(s), press Enter to stop",
        workers.len(),
        config.firefox_profiles.len()
    ));

    let active = Arc::new(AtomicBool::new(true));
    stop_on_enter(Arc::clone(&active));

    let worker_count = workers.len();
    let messages = listener.messages();
    let mut orchestrator = Orchestrator::new(source, workers, config.game.socket_prefix.clone());
    orchestrator.run(&messages, &active, config.game.poll_interval, |status| {
        on_status(status, worker_count);
    });

    if active.load(Ordering::Acquire) {
        warn!("websocket listener stopped, ending the session");
    }
    info!("stopping listener and bots");
    let mut workers = orchestrator.into_workers();
    let listener_closed = listener.close();
    close_all(&mut workers).context("closing bots")?;
    listener_closed.context("closing websocket listener")?;
    Ok(())
}

/// Clear `active` once a line (or EOF) arrives on stdin
fn stop_on_enter(active: Arc<AtomicBool>) {
    thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        active.store(false, Ordering::Release);
    });
}

/// Print a prompt and wait for one line of input
///
/// # Errors
///
/// Returns an I/O error if stdout or stdin fails.
pub fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(profiles: usize) -> RunConfig {
        RunConfig {
            game: GameConfig::for_code("abc"),
            chromedriver_url: "http://localhost:9515".into(),
            chrome: ChromeOptions::default(),
            geckodriver_host: "http://localhost/".into(),
            geckodriver_port: 4444,
            firefox_profiles: (0..profiles)
                .map(|i| PathBuf::from(format!("/profiles/{i}")))
                .collect(),
            headless_bots: true,
            window: WindowSize::default(),
            wordfinder_url: "http://localhost:1".into(),
        }
    }

    #[test]
    fn every_bot_gets_its_own_port() {
        let config = config(3);
        assert_eq!(config.geckodriver_url(0), "http://localhost:4444");
        assert_eq!(config.geckodriver_url(2), "http://localhost:4446");
    }

    #[test]
    fn listener_failure_aborts_the_session() {
        let mut config = config(1);
        config.chromedriver_url = "http://127.0.0.1:1".into();

        let result = run_live(&config, |_, _| {});

        assert!(result.is_err());
    }
}
