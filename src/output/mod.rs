//! Terminal output formatting
//!
//! Status lines for the user. Per-word worker outcomes are never printed.

pub mod display;
pub mod formatters;

pub use display::{print_replay_summary, print_status, print_unscramble_result};
