//! Sync and snapshot engine for CLI Config Manager
//!
//! This crate moves configuration trees between a CLI's install location
//! and a project's working copy, and keeps timestamped snapshots of the
//! install location so that changes can be undone:
//!
//! - **PatternMatcher**: ordered gitignore-style rules compiled to a predicate
//! - **TreeMirror**: filtered recursive copy that skips symlinks
//! - **LargeFileScanner**: pre-flight check for oversized files
//! - **SnapshotStore**: atomic snapshot creation with retention
//! - **SyncOrchestrator**: import, apply (with auto-backup and rollback) and restore
//!
//! # Architecture
//!
//! ```text
//!                  ccm-cli
//!                     |
//!                 ccm-core
//!                     |
//!             +-------+-------+
//!             |               |
//!          ccm-meta  ---->  ccm-fs
//! ```

pub mod config;
pub mod error;
pub mod ignore;
pub mod listing;
pub mod lock;
pub mod mirror;
pub mod scan;
pub mod snapshot;
pub mod sync;

mod walk;

pub use config::EngineConfig;
pub use error::{Error, ErrorKind, Result};
pub use ignore::PatternMatcher;
pub use listing::{FileEntry, list_dir};
pub use lock::ProjectLock;
pub use mirror::{MirrorStats, TreeMirror};
pub use scan::{LargeFile, LargeFileScanner};
pub use snapshot::{SnapshotMeta, SnapshotRequest, SnapshotSource, SnapshotStore, SnapshotType};
pub use sync::{ApplyReport, ImportOutcome, RestoreFailure, RestoreReport, SyncOrchestrator};
