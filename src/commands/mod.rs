//! Command implementations

pub mod replay;
pub mod run;
pub mod unscramble;

pub use replay::{QueueRecorder, ReplayError, ReplaySummary, load_frames, parse_frames, run_replay};
pub use run::{RunConfig, prompt, run_live};
pub use unscramble::{UnscrambleResult, unscramble};
