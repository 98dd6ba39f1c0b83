//! Game events decoded from the game socket
//!
//! The game talks socket.io over a websocket. Event frames look like
//! `42["<name>",<n>,{...packet...}]`; the packet's fields say what happened.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// socket.io "event" frame prefix (engine.io message + socket.io event)
const EVENT_FRAME_PREFIX: &str = "42";

/// Position of the packet object inside the event frame array
const PACKET_INDEX: usize = 2;

/// One websocket frame as captured from the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSocketMessage {
    pub url: String,
    pub payload: String,
}

impl WebSocketMessage {
    pub fn new(url: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            payload: payload.into(),
        }
    }
}

/// A game-state change the orchestrator reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A new level started with these letters
    ///
    /// `level` is only shown to the user; an unreadable number is `None`.
    NewLevel {
        level: Option<u32>,
        letters: Vec<char>,
    },
    /// These tiles are not part of any answer
    FalseLetters(Vec<char>),
    /// Hidden tiles were revealed
    HiddenLetters(Vec<char>),
    /// A scoring checkpoint was reached
    Marks(i64, i64),
    /// Level over, ranking shown
    Ranking,
}

impl GameEvent {
    /// Decode an event from a raw socket payload
    ///
    /// Returns `None` for anything that is not a recognised game packet.
    ///
    /// # Examples
    /// ```
    /// use wos_solver::core::GameEvent;
    ///
    /// let frame = r#"42["game",0,{"falseLetters":["a"]}]"#;
    /// assert_eq!(GameEvent::from_payload(frame), Some(GameEvent::FalseLetters(vec!['a'])));
    /// assert_eq!(GameEvent::from_payload("3probe"), None);
    /// ```
    #[must_use]
    pub fn from_payload(payload: &str) -> Option<Self> {
        Self::from_packet(&extract_packet(payload)?)
    }

    /// Decode an event from an already extracted packet object
    ///
    /// The first recognised key wins, checked in the order `level`,
    /// `falseLetters`, `hiddenLetters`, `marks`, `ranking`. Packets with a
    /// `uid` field belong to player traffic and are ignored.
    #[must_use]
    pub fn from_packet(packet: &Value) -> Option<Self> {
        let object = packet.as_object()?;
        if object.contains_key("uid") {
            return None;
        }

        if let Some(level) = object.get("level") {
            let level = decode_level(level);
            let letters = decode_letters(object.get("letters")?)?;
            Some(Self::NewLevel { level, letters })
        } else if let Some(letters) = object.get("falseLetters") {
            decode_letters(letters).map(Self::FalseLetters)
        } else if let Some(letters) = object.get("hiddenLetters") {
            decode_letters(letters).map(Self::HiddenLetters)
        } else if let Some(marks) = object.get("marks") {
            let (reached, base) = <(i64, i64)>::deserialize(marks).ok()?;
            Some(Self::Marks(reached, base))
        } else if object.contains_key("ranking") {
            Some(Self::Ranking)
        } else {
            None
        }
    }

    /// Short name used in logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewLevel { .. } => "new-level",
            Self::FalseLetters(_) => "false-letters",
            Self::HiddenLetters(_) => "hidden-letters",
            Self::Marks(..) => "marks",
            Self::Ranking => "ranking",
        }
    }
}

/// Pull the packet object out of a socket.io event frame
fn extract_packet(payload: &str) -> Option<Value> {
    let body = payload.strip_prefix(EVENT_FRAME_PREFIX)?;
    let mut frame: Vec<Value> = serde_json::from_str(body).ok()?;
    if frame.len() <= PACKET_INDEX {
        return None;
    }
    Some(frame.swap_remove(PACKET_INDEX))
}

/// Level number in whatever shape the game sent it
fn decode_level(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Letters come as an array of strings, normally one character each, or as
/// one plain string
fn decode_letters(value: &Value) -> Option<Vec<char>> {
    if let Some(text) = value.as_str() {
        return Some(text.chars().collect());
    }
    let tiles: Vec<String> = Vec::deserialize(value).ok()?;
    Some(tiles.iter().flat_map(|tile| tile.chars()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn decodes_new_level() {
        let frame = r#"42["game",3,{"level":7,"letters":["t","e","s","l","a"]}]"#;
        assert_eq!(
            GameEvent::from_payload(frame),
            Some(GameEvent::NewLevel {
                level: Some(7),
                letters: vec!['t', 'e', 's', 'l', 'a'],
            })
        );
    }

    #[test]
    fn decodes_letter_corrections() {
        let hidden = r#"42["game",3,{"hiddenLetters":["s","l"]}]"#;
        assert_eq!(
            GameEvent::from_payload(hidden),
            Some(GameEvent::HiddenLetters(vec!['s', 'l']))
        );

        let false_letters = r#"42["game",3,{"falseLetters":["x"]}]"#;
        assert_eq!(
            GameEvent::from_payload(false_letters),
            Some(GameEvent::FalseLetters(vec!['x']))
        );
    }

    #[test]
    fn decodes_marks_and_ranking() {
        assert_eq!(
            GameEvent::from_payload(r#"42["game",1,{"marks":[12,4]}]"#),
            Some(GameEvent::Marks(12, 4))
        );
        assert_eq!(
            GameEvent::from_payload(r#"42["game",1,{"ranking":[{"name":"x"}]}]"#),
            Some(GameEvent::Ranking)
        );
    }

    #[test]
    fn packets_with_uid_are_ignored() {
        let packet = json!({"uid": "abc", "level": 1, "letters": ["a"]});
        assert_eq!(GameEvent::from_packet(&packet), None);
    }

    #[test]
    fn level_wins_over_later_keys() {
        let packet = json!({"ranking": [], "level": 2, "letters": ["a", "b"]});
        assert!(matches!(
            GameEvent::from_packet(&packet),
            Some(GameEvent::NewLevel { level: Some(2), .. })
        ));
    }

    #[test]
    fn multi_character_tiles_are_flattened() {
        let packet = json!({"falseLetters": ["ab", "c"]});
        assert_eq!(
            GameEvent::from_packet(&packet),
            Some(GameEvent::FalseLetters(vec!['a', 'b', 'c']))
        );
    }

    #[rstest]
    #[case("2")]
    #[case("3probe")]
    #[case("40")]
    #[case(r#"42["game"]"#)]
    #[case(r#"42["game",1]"#)]
    #[case(r#"42["game",1,"text"]"#)]
    #[case(r#"42["game",1,{"other":true}]"#)]
    #[case(r#"42["game",1,{"level":1}]"#)]
    #[case(r#"42["game",1,{"marks":[1]}]"#)]
    #[case(r#"42["game",1,{"falseLetters":5}]"#)]
    #[case(r#"42["game",1,{"level":1,"letters":[1,2]}]"#)]
    #[case("42 not json")]
    fn malformed_frames_are_ignored(#[case] payload: &str) {
        assert_eq!(GameEvent::from_payload(payload), None);
    }

    #[rstest]
    #[case(json!(3), Some(3))]
    #[case(json!("3"), Some(3))]
    #[case(json!(3.0), Some(3))]
    #[case(json!(2.5), None)]
    #[case(json!(null), None)]
    #[case(json!("one"), None)]
    #[case(json!(-1), None)]
    fn any_level_value_still_starts_a_round(#[case] level: Value, #[case] expected: Option<u32>) {
        let packet = json!({"level": level, "letters": ["t", "e", "s", "l", "a"]});
        assert_eq!(
            GameEvent::from_packet(&packet),
            Some(GameEvent::NewLevel {
                level: expected,
                letters: vec!['t', 'e', 's', 'l', 'a'],
            })
        );
    }

    #[test]
    fn plain_string_letters_are_accepted() {
        let packet = json!({"level": 1, "letters": "tesla"});
        assert!(matches!(
            GameEvent::from_packet(&packet),
            Some(GameEvent::NewLevel { letters, .. }) if letters == ['t', 'e', 's', 'l', 'a']
        ));
        assert_eq!(
            GameEvent::from_packet(&json!({"falseLetters": "ab"})),
            Some(GameEvent::FalseLetters(vec!['a', 'b']))
        );
    }

    #[test]
    fn message_serializes_as_url_and_payload() {
        let msg = WebSocketMessage::new("wss://x", "42[]");
        let text = serde_json::to_string(&msg).unwrap();
        assert_eq!(text, r#"{"url":"wss://x","payload":"42[]"}"#);
    }
}
