//! Words on Stream solver
//!
//! Watches a Words on Stream game through a browser websocket listener and
//! plays it with a pool of browser bots, each typing its share of the
//! candidate words.
//!
//! # Quick Start
//!
//! ```rust
//! use wos_solver::core::{LetterState, Wordlist};
//!
//! let mut state = LetterState::new();
//! state.start_round("tes?a".chars());
//! assert_eq!(state.reveal_letters(&['l']), Some(1));
//! assert_eq!(state.current().map(ToString::to_string).as_deref(), Some("tesal"));
//!
//! let wordlist = Wordlist::new(vec!["slate".into(), "let".into(), "teal".into()]);
//! assert_eq!(wordlist.partition(2), vec![vec!["slate"], vec!["teal"]]);
//! ```

// Core domain types
pub mod core;

// Game endpoints and selectors
pub mod config;

// Word lookup
pub mod wordsource;

// Round tracking and word distribution
pub mod dispatch;

// Bot workers
pub mod worker;

// Browser automation
pub mod webdriver;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
