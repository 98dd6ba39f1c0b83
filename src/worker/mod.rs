//! Browser workers
//!
//! A worker owns a game page and a private word queue. The orchestrator
//! pushes words in; the worker decides per word whether to type it.

pub mod event_loop;
pub mod handle;
pub mod page;

pub use event_loop::{Attempt, WorkerLoop};
pub use handle::{WordSink, Worker, WorkerError, close_all, start_all};
pub use page::{GamePage, PageError, PageLauncher};
