//! Timestamped snapshots of install paths
//!
//! Snapshots live at `Projects/<p>/backup/bak<timestamp>/` with:
//! - meta.json: type, source, included CLIs and notes
//! - one directory per CLI key holding a full copy of its install path
//! - `_additionalFiles/<cliKey>/` holding each CLI's additional files, kept
//!   apart from the install copies so no install content can shadow them

mod meta;
mod store;

pub use meta::{SnapshotMeta, SnapshotSource, SnapshotType};
pub use store::{SnapshotRequest, SnapshotStore};
