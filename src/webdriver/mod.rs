//! Browser automation over the W3C WebDriver protocol
//!
//! Bots play through Firefox (geckodriver); game traffic is captured from a
//! separate Chrome session (chromedriver).

pub mod capabilities;
pub mod client;
pub mod listener;
pub mod page;

pub use capabilities::{ChromeOptions, FirefoxOptions, WindowSize};
pub use client::{WebDriver, WebDriverError};
pub use listener::{ListenerError, WsListener};
pub use page::{FirefoxLauncher, WosPage};
