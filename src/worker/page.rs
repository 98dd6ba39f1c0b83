//! Browser surface a worker plays on

use thiserror::Error;

/// A browser interaction that did not go through
#[derive(Debug, Error)]
pub enum PageError {
    #[error("element `{0}` not found")]
    NotFound(String),
    #[error("browser session unavailable: {0}")]
    Session(String),
    #[error("browser interaction failed: {0}")]
    Interaction(String),
}

/// The three things a worker does with the game page
pub trait GamePage {
    /// Words already placed in the room, as shown on the page
    ///
    /// # Errors
    ///
    /// Returns an error if the room cannot be read (page not ready).
    fn visible_words(&mut self) -> Result<Vec<String>, PageError>;

    /// Focus the input, clear it, type `word` and press Enter
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the interaction fails.
    fn submit_word(&mut self, word: &str) -> Result<(), PageError>;

    /// Whether the lock icon next to the input is showing
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be queried.
    fn lock_indicator_present(&mut self) -> Result<bool, PageError>;

    /// Release the underlying browser session
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// Opens a fresh game page inside the worker's thread
pub trait PageLauncher: Send + 'static {
    type Page: GamePage;

    /// Start a browser session and navigate it to the game
    ///
    /// # Errors
    ///
    /// Returns an error if the browser session cannot be created.
    fn launch(&self) -> Result<Self::Page, PageError>;
}
