//! Core domain types for the game
//!
//! Pure types with no I/O: the board letters, decoded game events and
//! candidate word lists.

pub mod event;
mod letters;
pub mod wordlist;

pub use event::{GameEvent, WebSocketMessage};
pub use letters::{LetterSet, LetterState, PLACEHOLDER};
pub use wordlist::{MIN_WORD_LENGTH, Wordlist};
