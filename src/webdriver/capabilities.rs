//! Browser capabilities for bots and the listener

use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// Window size used when running headless
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Firefox setup for a bot
#[derive(Debug, Clone, Default)]
pub struct FirefoxOptions {
    /// Profile directory holding the game login
    pub profile: Option<PathBuf>,
    pub headless: bool,
    pub window: WindowSize,
    pub private_mode: bool,
}

impl FirefoxOptions {
    /// W3C capabilities for geckodriver
    ///
    /// Headless sessions are also muted and stripped of caches, WebRTC and
    /// start pages so they stay light.
    #[must_use]
    pub fn capabilities(&self) -> Value {
        let mut args: Vec<String> = Vec::new();
        let mut prefs = Map::new();
        let mut env = Map::new();

        if let Some(profile) = &self.profile {
            args.push("-profile".to_string());
            args.push(profile.display().to_string());
        }

        if self.headless {
            let WindowSize { width, height } = self.window;
            env.insert("MOZ_HEADLESS_WIDTH".into(), width.to_string().into());
            env.insert("MOZ_HEADLESS_HEIGHT".into(), height.to_string().into());
            args.push("--headless".to_string());
            args.push(format!("--window-size={width},{height}"));
            args.push("--start-maximized".to_string());

            let headless_prefs: [(&str, Value); 10] = [
                ("media.volume_scale", "0.0".into()),
                ("browser.cache.disk.enable", false.into()),
                ("browser.cache.memory.enable", false.into()),
                ("browser.cache.offline.enable", false.into()),
                ("network.http.use-cache", false.into()),
                ("media.peerconnection.enabled", false.into()),
                ("browser.startup.homepage_welcome_url", "".into()),
                ("startup.homepage_welcome_url.additional", "".into()),
                ("browser.newtabpage.enabled", false.into()),
                ("browser.sessionstore.resume_from_crash", false.into()),
            ];
            for (name, value) in headless_prefs {
                prefs.insert(name.to_string(), value);
            }
        }

        if self.private_mode {
            prefs.insert("browser.privatebrowsing.autostart".into(), true.into());
        }

        json!({
            "browserName": "firefox",
            "moz:firefoxOptions": {
                "args": args,
                "prefs": prefs,
                "env": env,
            },
        })
    }
}

/// Chrome setup for the websocket listener
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    /// Chrome user data directory; the driver's default when absent
    pub user_data_dir: Option<PathBuf>,
    /// Profile inside the user data directory holding the Twitch login
    pub profile_directory: String,
    pub headless: bool,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            user_data_dir: None,
            profile_directory: "Default".to_string(),
            headless: false,
        }
    }
}

impl ChromeOptions {
    /// W3C capabilities for chromedriver, with performance logging on
    #[must_use]
    pub fn capabilities(&self) -> Value {
        let mut args = vec![format!("--profile-directory={}", self.profile_directory)];
        if let Some(dir) = &self.user_data_dir {
            args.push(format!("--user-data-dir={}", dir.display()));
        }
        if self.headless {
            args.push("--headless=new".to_string());
            args.push("--mute-audio".to_string());
        }

        json!({
            "browserName": "chrome",
            "goog:chromeOptions": { "args": args },
            "goog:loggingPrefs": { "performance": "ALL" },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_firefox_has_no_extras() {
        let caps = FirefoxOptions::default().capabilities();
        assert_eq!(caps["browserName"], "firefox");
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!([]));
        assert_eq!(caps["moz:firefoxOptions"]["prefs"], json!({}));
    }

    #[test]
    fn firefox_profile_is_passed_as_argument() {
        let options = FirefoxOptions {
            profile: Some(PathBuf::from("/profiles/bot1")),
            ..FirefoxOptions::default()
        };
        let caps = options.capabilities();
        assert_eq!(
            caps["moz:firefoxOptions"]["args"],
            json!(["-profile", "/profiles/bot1"])
        );
    }

    #[test]
    fn headless_firefox_sets_size_and_prefs() {
        let options = FirefoxOptions {
            headless: true,
            window: WindowSize {
                width: 1280,
                height: 720,
            },
            ..FirefoxOptions::default()
        };
        let caps = options.capabilities();
        let firefox = &caps["moz:firefoxOptions"];

        assert_eq!(firefox["env"]["MOZ_HEADLESS_WIDTH"], "1280");
        assert_eq!(firefox["env"]["MOZ_HEADLESS_HEIGHT"], "720");
        let args = firefox["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless")));
        assert!(args.contains(&json!("--window-size=1280,720")));
        assert_eq!(firefox["prefs"]["media.peerconnection.enabled"], false);
        assert_eq!(firefox["prefs"]["network.http.use-cache"], false);
    }

    #[test]
    fn private_mode_pref() {
        let options = FirefoxOptions {
            private_mode: true,
            ..FirefoxOptions::default()
        };
        let caps = options.capabilities();
        assert_eq!(
            caps["moz:firefoxOptions"]["prefs"]["browser.privatebrowsing.autostart"],
            true
        );
    }

    #[test]
    fn chrome_enables_performance_log() {
        let caps = ChromeOptions::default().capabilities();
        assert_eq!(caps["goog:loggingPrefs"]["performance"], "ALL");
        assert_eq!(
            caps["goog:chromeOptions"]["args"],
            json!(["--profile-directory=Default"])
        );
    }

    #[test]
    fn chrome_headless_and_user_data() {
        let options = ChromeOptions {
            user_data_dir: Some(PathBuf::from("/chrome")),
            headless: true,
            ..ChromeOptions::default()
        };
        let args = options.capabilities()["goog:chromeOptions"]["args"].clone();
        assert_eq!(
            args,
            json!([
                "--profile-directory=Default",
                "--user-data-dir=/chrome",
                "--headless=new",
                "--mute-audio"
            ])
        );
    }
}
