//! # Trellis Core Library
//!
//! Core library for trellis: turns a raw commit graph into a deterministic,
//! layered view of connected *stacks* (maximal unbranching chains of
//! commits) and resolves drag-and-drop rearrangement gestures into canonical
//! history-editing commands. The library never mutates a repository — the
//! commit graph arrives wholesale from an external source, every derived
//! structure is recomputed from it, and resolved commands leave through the
//! [`dispatch::CommandDispatcher`] seam.

pub mod commit;
pub mod dispatch;
pub mod divergence;
pub mod dnd;
pub mod hunk;
pub mod id;
pub mod layout;
pub mod output;
pub mod parallel;
pub mod stacks;
pub mod stats;

// Re-export the main types for consumers
pub use commit::{Commit, CommitAuthor, CommitGraph};
pub use dispatch::{CommandDispatcher, CommandGate, CommandPermit, DispatchError, create_empty_change, dispatch_guarded};
pub use divergence::{DivergentChange, divergent_changes, is_divergent};
pub use dnd::{
  CommandTarget, DomainCommand, DragPayload, DragSession, DropZonePosition, FileChange, FileStatus, MoveDestination,
  Resolution, TransferData, TransferKind, resolve_drop, resolve_payload,
};
pub use hunk::{LineRange, RangeSpecError, parse_hunk_header, parse_range_spec};
pub use id::{BookmarkName, ChangeId, CommitId, StackId};
pub use layout::StackLayout;
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
pub use parallel::{ParallelGroup, detect_parallel_groups};
pub use stacks::{Connection, ConnectionKind, Stack, StackGraph};
pub use stats::{CommitStats, StackFetch, StatsProvider, StatsStore, fetch_stack_stats};
