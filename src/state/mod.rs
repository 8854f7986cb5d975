//! On-disk state: the last posted verse and per-run logs.

mod run_log;
mod store;

pub use run_log::{PREVIEW_CHARS, RunLog, RunLogWriter, RunStep, preview};
pub use store::{PosterState, StateError, StateStore};
