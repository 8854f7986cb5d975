//! Run orchestration.
//!
//! Sequences state loading, override detection, progression, fetching,
//! publishing and persistence for one scheduled invocation.

mod commit;
mod runner;

pub use commit::{CommitError, GitCommitter, NoopCommitter, StateCommitter, commit_message};
pub use runner::{DailyPoster, PosterServices, RunOutcome};
