//! # Trellis CLI Library
//!
//! Library modules for the trellis command-line tool: the clap surface, the
//! git-backed commit graph source, the stack view renderer, and the preview
//! command dispatcher.

pub mod cli;
pub mod dispatcher;
pub mod git;
pub mod render;
