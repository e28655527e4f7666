//! Commit graph input model.
//!
//! The commit graph is supplied wholesale by an external query layer (a
//! repository walker, a test fixture) and is read-only to everything built on
//! top of it: stack construction and layout are recomputed from scratch on
//! every refresh and hold no state of their own. Children are declared by the
//! source; parent links are derived here so both directions are cheap to
//! query.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::id::{ChangeId, CommitId};

/// Author attribution carried by a commit snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
  pub name: String,
}

/// Immutable snapshot of a single commit's metadata.
///
/// Identified externally by [`CommitId`], but carries its own stable
/// [`ChangeId`]: amending a commit produces a fresh `CommitId` for the same
/// `ChangeId`, which is why divergence detection groups by change rather than
/// commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
  pub change_id: ChangeId,
  pub description: String,
  pub author: CommitAuthor,
  pub timestamp: DateTime<Utc>,
  pub has_conflicts: bool,
}

impl Commit {
  /// First line of the description, used anywhere a one-line summary is
  /// rendered.
  pub fn summary(&self) -> &str {
    self.description.lines().next().unwrap_or("")
  }
}

/// A commit plus the children its source declared for it.
#[derive(Debug, Clone)]
struct CommitEntry {
  commit: Commit,
  children: Vec<CommitId>,
}

/// Read-only mapping from commit id to commit metadata and child ids.
///
/// Construction tolerates dangling references: a child id that never appears
/// as a key is recorded but excluded from resolved traversal, so a truncated
/// or mid-rewrite snapshot degrades to a smaller graph instead of a panic.
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
  entries: BTreeMap<CommitId, CommitEntry>,
  parents: HashMap<CommitId, Vec<CommitId>>,
}

impl CommitGraph {
  /// Build a graph from `(id, commit, children)` triples.
  ///
  /// Later triples with a duplicate id replace earlier ones. Parent links are
  /// derived from the declared children, considering only children that are
  /// present as keys.
  pub fn from_entries<I>(entries: I) -> Self
  where
    I: IntoIterator<Item = (CommitId, Commit, Vec<CommitId>)>,
  {
    let mut map = BTreeMap::new();
    for (id, commit, children) in entries {
      if map.insert(id.clone(), CommitEntry { commit, children }).is_some() {
        debug!(commit = %id, "duplicate commit entry replaced");
      }
    }

    let mut parents: HashMap<CommitId, Vec<CommitId>> = HashMap::new();
    for (id, entry) in &map {
      for child in &entry.children {
        if map.contains_key(child) {
          parents.entry(child.clone()).or_default().push(id.clone());
        } else {
          debug!(commit = %id, child = %child, "skipping dangling child reference");
        }
      }
    }

    Self { entries: map, parents }
  }

  /// Number of commits in the graph.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when the graph contains no commits.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Returns `true` when the commit is present.
  pub fn contains(&self, id: &CommitId) -> bool {
    self.entries.contains_key(id)
  }

  /// Look up a commit's metadata.
  pub fn get(&self, id: &CommitId) -> Option<&Commit> {
    self.entries.get(id).map(|entry| &entry.commit)
  }

  /// Children of a commit, restricted to children present in the graph.
  ///
  /// Order follows the source's declaration order.
  pub fn children(&self, id: &CommitId) -> Vec<&CommitId> {
    self
      .entries
      .get(id)
      .map(|entry| {
        entry
          .children
          .iter()
          .filter(|child| self.entries.contains_key(*child))
          .collect()
      })
      .unwrap_or_default()
  }

  /// Parents of a commit, derived from declared child edges.
  pub fn parents(&self, id: &CommitId) -> &[CommitId] {
    self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Commits with no parent in the graph, in id order.
  pub fn roots(&self) -> Vec<&CommitId> {
    self
      .entries
      .keys()
      .filter(|id| self.parents(id).is_empty())
      .collect()
  }

  /// Commits with no resolved child in the graph, in id order.
  pub fn leaves(&self) -> Vec<&CommitId> {
    self
      .entries
      .keys()
      .filter(|id| self.children(id).is_empty())
      .collect()
  }

  /// Iterate over `(id, commit)` pairs in id order.
  pub fn iter(&self) -> impl Iterator<Item = (&CommitId, &Commit)> {
    self.entries.iter().map(|(id, entry)| (id, &entry.commit))
  }

  /// Iterate over commit ids in id order.
  pub fn ids(&self) -> impl Iterator<Item = &CommitId> {
    self.entries.keys()
  }
}

#[cfg(test)]
mod tests {
  use trellis_test_utils::graph::{commit, graph_from_edges};

  use super::*;
  use crate::id::CommitId;

  #[test]
  fn derives_parent_links_from_children() {
    let graph = graph_from_edges(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);

    assert_eq!(graph.parents(&CommitId::from("a")), &[]);
    assert_eq!(graph.parents(&CommitId::from("b")), &[CommitId::from("a")]);
    assert_eq!(graph.children(&CommitId::from("b")), vec![&CommitId::from("c")]);
  }

  #[test]
  fn dangling_children_are_excluded_from_traversal() {
    let graph = CommitGraph::from_entries(vec![
      (CommitId::from("a"), commit("a"), vec![CommitId::from("missing")]),
    ]);

    assert_eq!(graph.len(), 1);
    assert!(graph.children(&CommitId::from("a")).is_empty());
    assert_eq!(graph.leaves(), vec![&CommitId::from("a")]);
  }

  #[test]
  fn roots_and_leaves_of_a_fan_out() {
    let graph = graph_from_edges(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);

    assert_eq!(graph.roots(), vec![&CommitId::from("a")]);
    assert_eq!(graph.leaves(), vec![&CommitId::from("b"), &CommitId::from("c")]);
  }

  #[test]
  fn summary_is_first_description_line() {
    let mut c = commit("a");
    c.description = "first line\nsecond line".to_string();
    assert_eq!(c.summary(), "first line");
  }
}
