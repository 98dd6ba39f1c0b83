//! Minimal blocking W3C WebDriver client
//!
//! Speaks just enough of the protocol to drive a game page: sessions,
//! navigation, CSS element lookup, typing, key actions and session logs.

use reqwest::Method;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Key under which W3C drivers return element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// WebDriver code point for the Enter key
const ENTER_KEY: &str = "\u{E007}";

#[derive(Debug, Error)]
pub enum WebDriverError {
    #[error("webdriver request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webdriver {error}: {message}")]
    Command { error: String, message: String },
    #[error("unexpected webdriver response: {0}")]
    Protocol(String),
}

impl WebDriverError {
    /// The driver reported that no element matched
    #[must_use]
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::Command { error, .. } if error == "no such element")
    }
}

/// Reference to an element inside the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(String);

impl ElementRef {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One entry of a driver-side log
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: i64,
}

/// A live WebDriver session
pub struct WebDriver {
    http: Client,
    base: String,
    session_id: String,
}

impl WebDriver {
    /// Open a new session on the driver at `base`
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is unreachable or refuses the
    /// capabilities.
    pub fn new_session(base: &str, capabilities: Value) -> Result<Self, WebDriverError> {
        // Commands may legitimately take as long as the page does
        let http = Client::builder().timeout(None::<Duration>).build()?;
        let base = base.trim_end_matches('/').to_string();

        let body = json!({ "capabilities": { "alwaysMatch": capabilities } });
        let value = send(&http, Method::POST, &format!("{base}/session"), Some(&body))?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WebDriverError::Protocol("new session without sessionId".into()))?
            .to_string();

        debug!(%base, %session_id, "webdriver session created");
        Ok(Self {
            http,
            base,
            session_id,
        })
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}/session/{}{path}", self.base, self.session_id);
        send(&self.http, method, &url, body)
    }

    /// # Errors
    ///
    /// Returns an error if navigation fails.
    pub fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        self.command(Method::POST, "/url", Some(&json!({ "url": url })))?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a `no such element` command error when nothing matches.
    pub fn find_element(&self, css: &str) -> Result<ElementRef, WebDriverError> {
        let value = self.command(Method::POST, "/element", Some(&css_locator(css)))?;
        decode_element(&value)
    }

    /// # Errors
    ///
    /// Returns an error if the lookup itself fails; no match is an empty list.
    pub fn find_elements(&self, css: &str) -> Result<Vec<ElementRef>, WebDriverError> {
        let value = self.command(Method::POST, "/elements", Some(&css_locator(css)))?;
        value
            .as_array()
            .ok_or_else(|| WebDriverError::Protocol("elements response is not a list".into()))?
            .iter()
            .map(decode_element)
            .collect()
    }

    /// # Errors
    ///
    /// Returns an error if the element is stale or not interactable.
    pub fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.element_command(element, "/click", &json!({}))
    }

    /// # Errors
    ///
    /// Returns an error if the element is stale or not editable.
    pub fn clear(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.element_command(element, "/clear", &json!({}))
    }

    /// # Errors
    ///
    /// Returns an error if the element is stale or not interactable.
    pub fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        self.element_command(element, "/value", &json!({ "text": text }))
    }

    /// # Errors
    ///
    /// Returns an error if the element is stale.
    pub fn element_text(&self, element: &ElementRef) -> Result<String, WebDriverError> {
        let path = format!("/element/{}/text", element.id());
        let value = self.command(Method::GET, &path, None)?;
        value
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| WebDriverError::Protocol("element text is not a string".into()))
    }

    fn element_command(
        &self,
        element: &ElementRef,
        action: &str,
        body: &Value,
    ) -> Result<(), WebDriverError> {
        let path = format!("/element/{}{action}", element.id());
        self.command(Method::POST, &path, Some(body))?;
        Ok(())
    }

    /// Press and release Enter on whatever has focus
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the key actions.
    pub fn press_enter(&self) -> Result<(), WebDriverError> {
        let actions = json!({
            "actions": [{
                "type": "key",
                "id": "keyboard",
                "actions": [
                    { "type": "keyDown", "value": ENTER_KEY },
                    { "type": "keyUp", "value": ENTER_KEY },
                ],
            }],
        });
        self.command(Method::POST, "/actions", Some(&actions))?;
        self.command(Method::DELETE, "/actions", None)?;
        Ok(())
    }

    /// Drain a driver-side log, e.g. Chrome's `performance` log
    ///
    /// # Errors
    ///
    /// Returns an error if the driver does not support the log type.
    pub fn logs(&self, kind: &str) -> Result<Vec<LogEntry>, WebDriverError> {
        let value = self.command(Method::POST, "/se/log", Some(&json!({ "type": kind })))?;
        Vec::<LogEntry>::deserialize(value)
            .map_err(|err| WebDriverError::Protocol(format!("log entries: {err}")))
    }

    /// End the session and close the browser
    ///
    /// # Errors
    ///
    /// Returns an error if the driver could not be reached.
    pub fn quit(self) -> Result<(), WebDriverError> {
        self.command(Method::DELETE, "", None)?;
        debug!(session_id = %self.session_id, "webdriver session closed");
        Ok(())
    }
}

fn css_locator(css: &str) -> Value {
    json!({ "using": "css selector", "value": css })
}

fn send(
    http: &Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
) -> Result<Value, WebDriverError> {
    trace!(method = method.as_str(), url, "webdriver command");
    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(body);
    }
    let response = request.send()?;
    let success = response.status().is_success();
    decode_response(success, &response.text()?)
}

/// Unwrap the `value` of a response, turning error payloads into errors
fn decode_response(success: bool, body: &str) -> Result<Value, WebDriverError> {
    let mut parsed: Value = serde_json::from_str(body)
        .map_err(|err| WebDriverError::Protocol(format!("response is not json: {err}")))?;
    let value = parsed
        .get_mut("value")
        .map(Value::take)
        .ok_or_else(|| WebDriverError::Protocol("response without value".into()))?;

    if success {
        return Ok(value);
    }

    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Err(WebDriverError::Command {
        error: field("error"),
        message: field("message"),
    })
}

fn decode_element(value: &Value) -> Result<ElementRef, WebDriverError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| WebDriverError::Protocol("element reference missing".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_yields_value() {
        let value = decode_response(true, r#"{"value": {"sessionId": "abc"}}"#).unwrap();
        assert_eq!(value["sessionId"], "abc");
    }

    #[test]
    fn null_value_is_accepted() {
        assert_eq!(decode_response(true, r#"{"value": null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn error_payload_becomes_command_error() {
        let body = r#"{"value": {"error": "no such element", "message": "Unable to locate", "stacktrace": ""}}"#;
        let err = decode_response(false, body).unwrap_err();
        assert!(err.is_no_such_element());
        assert_eq!(err.to_string(), "webdriver no such element: Unable to locate");
    }

    #[test]
    fn other_command_errors_are_not_missing_elements() {
        let body = r#"{"value": {"error": "stale element reference", "message": "gone"}}"#;
        assert!(!decode_response(false, body).unwrap_err().is_no_such_element());
    }

    #[test]
    fn garbage_is_a_protocol_error() {
        assert!(matches!(
            decode_response(true, "<html>"),
            Err(WebDriverError::Protocol(_))
        ));
        assert!(matches!(
            decode_response(true, r#"{"status": 0}"#),
            Err(WebDriverError::Protocol(_))
        ));
    }

    #[test]
    fn element_reference_is_decoded() {
        let value = json!({ ELEMENT_KEY: "e-1" });
        assert_eq!(decode_element(&value).unwrap().id(), "e-1");
        assert!(decode_element(&json!({})).is_err());
    }

    #[test]
    fn log_entries_deserialize() {
        let value = json!([{ "level": "INFO", "message": "{}", "timestamp": 1 }]);
        let entries = Vec::<LogEntry>::deserialize(value).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "{}");
    }
}
