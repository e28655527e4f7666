//! Divergent change detection.
//!
//! A change id is *divergent* when more than one commit carrying it is
//! simultaneously present in the graph — the visible trace of the same
//! logical change having been amended along two paths. Grouping is by
//! [`ChangeId`], never by commit id, since every amendment mints a fresh
//! commit id for the same change.

use std::collections::BTreeMap;

use crate::commit::CommitGraph;
use crate::id::{ChangeId, CommitId};

/// A change id present on more than one commit at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivergentChange {
  pub change_id: ChangeId,
  /// All commits carrying the change, in commit-id order.
  pub commit_ids: Vec<CommitId>,
}

/// Collect every divergent change in the graph, in change-id order.
pub fn divergent_changes(graph: &CommitGraph) -> Vec<DivergentChange> {
  let mut by_change: BTreeMap<ChangeId, Vec<CommitId>> = BTreeMap::new();
  for (commit_id, commit) in graph.iter() {
    by_change
      .entry(commit.change_id.clone())
      .or_default()
      .push(commit_id.clone());
  }

  by_change
    .into_iter()
    .filter(|(_, commit_ids)| commit_ids.len() > 1)
    .map(|(change_id, commit_ids)| DivergentChange { change_id, commit_ids })
    .collect()
}

/// Returns `true` when the commit's change id is carried by another commit
/// in the graph as well.
pub fn is_divergent(graph: &CommitGraph, commit_id: &CommitId) -> bool {
  let Some(commit) = graph.get(commit_id) else {
    return false;
  };
  graph
    .iter()
    .any(|(other_id, other)| other_id != commit_id && other.change_id == commit.change_id)
}
