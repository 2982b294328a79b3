//! Shared test utilities for the CLI Config Manager workspace.
//!
//! This crate provides standardised fixtures so that crate test suites do
//! not each build their own scratch trees. It is a dev-dependency only and
//! is never published.
//!
//! # Modules
//!
//! - [`tree`]: write, read and digest directory trees
//! - [`workspace`]: [`TestWorkspace`] builder with registered CLIs and projects

pub mod tree;
pub mod workspace;

pub use tree::{read_tree, tree_digest, write_tree};
pub use workspace::TestWorkspace;
