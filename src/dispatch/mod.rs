//! Letter-state driven wordlist dispatch
//!
//! The dispatcher computes and splits wordlists; the orchestrator decides
//! when, based on incoming game events.

pub mod dispatcher;
pub mod orchestrator;

pub use dispatcher::WordlistDispatcher;
pub use orchestrator::{Orchestrator, RoundPhase, Status};
