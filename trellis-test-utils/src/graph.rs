//! Commit graph fixtures for unit tests.
//!
//! Fixtures build [`CommitGraph`] values directly from short string ids so
//! tests can describe a topology in one line. Change ids default to
//! `change-<id>` (unique per commit) unless a test needs controlled
//! divergence.

use chrono::{TimeZone, Utc};
use trellis_core::commit::{Commit, CommitAuthor, CommitGraph};
use trellis_core::id::CommitId;

/// A commit snapshot with a unique change id derived from `id`.
pub fn commit(id: &str) -> Commit {
  commit_with_change(id, &format!("change-{id}"))
}

/// A commit snapshot carrying an explicit change id.
pub fn commit_with_change(id: &str, change_id: &str) -> Commit {
  Commit {
    change_id: change_id.into(),
    description: format!("commit {id}"),
    author: CommitAuthor {
      name: "Test User".to_string(),
    },
    timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    has_conflicts: false,
  }
}

/// Build a graph from commit ids and `(parent, child)` edges.
pub fn graph_from_edges(ids: &[&str], edges: &[(&str, &str)]) -> CommitGraph {
  CommitGraph::from_entries(ids.iter().map(|id| {
    let children: Vec<CommitId> = edges
      .iter()
      .filter(|(parent, _)| parent == id)
      .map(|(_, child)| CommitId::from(*child))
      .collect();
    (CommitId::from(*id), commit(id), children)
  }))
}

/// Build a linear chain: each id is the parent of the next.
pub fn linear_graph(ids: &[&str]) -> CommitGraph {
  let edges: Vec<(&str, &str)> = ids.windows(2).map(|pair| (pair[0], pair[1])).collect();
  graph_from_edges(ids, &edges)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn linear_graph_chains_children() {
    let graph = linear_graph(&["a", "b", "c"]);
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.children(&CommitId::from("a")), vec![&CommitId::from("b")]);
    assert_eq!(graph.roots(), vec![&CommitId::from("a")]);
    assert_eq!(graph.leaves(), vec![&CommitId::from("c")]);
  }

  #[test]
  fn graph_from_edges_preserves_declaration_order() {
    let graph = graph_from_edges(&["a", "b", "c"], &[("a", "c"), ("a", "b")]);
    assert_eq!(
      graph.children(&CommitId::from("a")),
      vec![&CommitId::from("c"), &CommitId::from("b")]
    );
  }
}
