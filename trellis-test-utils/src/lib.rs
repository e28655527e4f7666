//! Test utilities shared across the trellis workspace
//!
//! This crate provides common testing infrastructure including:
//! - commit graph fixtures built from edge lists ([`graph`])
//! - temporary git repository management ([`git::GitRepoTestGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test
//! utilities may not be used by all tests, and the compiler cannot detect
//! usage across crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod git;
pub mod graph;

// Re-export commonly used items
pub use git::{GitRepoTestGuard, checkout_branch, create_branch, create_commit};
pub use graph::{commit, commit_with_change, graph_from_edges, linear_graph};
