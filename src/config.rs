//! Game endpoints and page selectors

use std::time::Duration;

/// Game socket every relevant websocket url starts with
pub const GAME_SOCKET_PREFIX: &str = "wss://wos2.gartic.es/socket.io";

/// Text input words are typed into
pub const INPUT_SELECTOR: &str = r#"input[id="inputText"]"#;

/// Words already placed in the room
pub const ROOM_WORD_SELECTOR: &str = r#"div[class^="Room_word"]"#;

/// Lock icon shown next to the input on a likely hit
pub const LOCK_ICON_SELECTOR: &str = r#"i[class^="Button_ico_lock"]"#;

/// Delay between empty-queue checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Everything a session needs to know about the game it joins
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub game_url: String,
    pub socket_prefix: String,
    pub input_selector: String,
    pub room_word_selector: String,
    pub lock_icon_selector: String,
    pub poll_interval: Duration,
}

impl GameConfig {
    /// Config for the game with the given code, using the default selectors
    ///
    /// # Examples
    /// ```
    /// use wos_solver::config::GameConfig;
    ///
    /// let config = GameConfig::for_code(" abc123 ");
    /// assert_eq!(config.game_url, "https://play.wos.gg/abc123/system");
    /// ```
    #[must_use]
    pub fn for_code(code: &str) -> Self {
        Self {
            game_url: game_url(code),
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_url: String::new(),
            socket_prefix: GAME_SOCKET_PREFIX.to_string(),
            input_selector: INPUT_SELECTOR.to_string(),
            room_word_selector: ROOM_WORD_SELECTOR.to_string(),
            lock_icon_selector: LOCK_ICON_SELECTOR.to_string(),
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Streamer-side url of a game
#[must_use]
pub fn game_url(code: &str) -> String {
    format!("https://play.wos.gg/{}/system", code.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_game_selectors() {
        let config = GameConfig::default();
        assert_eq!(config.socket_prefix, GAME_SOCKET_PREFIX);
        assert_eq!(config.input_selector, INPUT_SELECTOR);
        assert_eq!(config.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn for_code_builds_url() {
        assert_eq!(
            GameConfig::for_code("XYZ").game_url,
            "https://play.wos.gg/XYZ/system"
        );
    }
}
