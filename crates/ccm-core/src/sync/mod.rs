//! Import, apply and restore
//!
//! The three user-facing transfers between an install path, its working
//! copy and the project's snapshots.

mod orchestrator;
mod outcome;

pub use orchestrator::SyncOrchestrator;
pub use outcome::{ApplyReport, ImportOutcome, RestoreFailure, RestoreReport};
