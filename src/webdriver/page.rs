//! The game page driven through WebDriver

use super::capabilities::FirefoxOptions;
use super::client::{WebDriver, WebDriverError};
use crate::config::GameConfig;
use crate::worker::{GamePage, PageError, PageLauncher};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Pause between focusing the input and clearing it
const FOCUS_DELAY: Duration = Duration::from_millis(100);

impl From<WebDriverError> for PageError {
    fn from(err: WebDriverError) -> Self {
        match err {
            WebDriverError::Command { error, message } if error == "no such element" => {
                Self::NotFound(message)
            }
            WebDriverError::Http(err) => Self::Session(err.to_string()),
            other => Self::Interaction(other.to_string()),
        }
    }
}

/// A game page open in one WebDriver session
pub struct WosPage {
    driver: WebDriver,
    config: GameConfig,
}

impl WosPage {
    #[must_use]
    pub const fn new(driver: WebDriver, config: GameConfig) -> Self {
        Self { driver, config }
    }
}

impl GamePage for WosPage {
    fn visible_words(&mut self) -> Result<Vec<String>, PageError> {
        let elements = self.driver.find_elements(&self.config.room_word_selector)?;

        // Words can vanish between lookup and read; skip those
        let words = elements
            .iter()
            .filter_map(|element| self.driver.element_text(element).ok())
            .collect();
        Ok(words)
    }

    fn submit_word(&mut self, word: &str) -> Result<(), PageError> {
        let input = self.driver.find_element(&self.config.input_selector)?;
        self.driver.click(&input)?;
        thread::sleep(FOCUS_DELAY);
        self.driver.clear(&input)?;
        self.driver.send_keys(&input, word)?;
        self.driver.press_enter()?;
        Ok(())
    }

    fn lock_indicator_present(&mut self) -> Result<bool, PageError> {
        match self.driver.find_element(&self.config.lock_icon_selector) {
            Ok(_) => Ok(true),
            Err(err) if err.is_no_such_element() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn release(self) {
        let session_id = self.driver.session_id().to_string();
        match self.driver.quit() {
            Ok(()) => debug!(%session_id, "browser released"),
            Err(err) => warn!(%session_id, error = %err, "could not close browser"),
        }
    }
}

/// Opens the game in a new Firefox session
pub struct FirefoxLauncher {
    webdriver_url: String,
    options: FirefoxOptions,
    config: GameConfig,
}

impl FirefoxLauncher {
    pub fn new(webdriver_url: impl Into<String>, options: FirefoxOptions, config: GameConfig) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            options,
            config,
        }
    }
}

impl PageLauncher for FirefoxLauncher {
    type Page = WosPage;

    fn launch(&self) -> Result<WosPage, PageError> {
        let driver = WebDriver::new_session(&self.webdriver_url, self.options.capabilities())
            .map_err(|err| PageError::Session(err.to_string()))?;

        if let Err(err) = driver.navigate(&self.config.game_url) {
            let _ = driver.quit();
            return Err(PageError::Session(err.to_string()));
        }

        debug!(url = %self.config.game_url, "game page opened");
        Ok(WosPage::new(driver, self.config.clone()))
    }
}
