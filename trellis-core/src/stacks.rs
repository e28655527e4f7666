//! Stack construction and connection classification.
//!
//! A *stack* is a maximal unbranching chain of commits: walking it
//! oldest-to-newest, every interior commit has exactly one child and exactly
//! one parent. Stack boundaries fall wherever the commit graph branches,
//! merges, or ends, and every cross-boundary edge becomes a classified
//! connection between two stacks.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::commit::CommitGraph;
use crate::id::{CommitId, StackId};

/// A maximal unbranching chain of commits, oldest first.
#[derive(Debug, Clone)]
pub struct Stack {
  id: StackId,
  commits: Vec<CommitId>,
  parent_stacks: BTreeSet<StackId>,
  child_stacks: BTreeSet<StackId>,
}

impl Stack {
  /// Identifier of this stack within its graph.
  pub fn id(&self) -> StackId {
    self.id
  }

  /// The commits of the chain, oldest first. Never empty.
  pub fn commits(&self) -> &[CommitId] {
    &self.commits
  }

  /// Oldest commit of the chain.
  pub fn base(&self) -> &CommitId {
    &self.commits[0]
  }

  /// Newest commit of the chain.
  pub fn tip(&self) -> &CommitId {
    self.commits.last().expect("stack is never empty")
  }

  /// Stacks immediately upstream of this one.
  pub fn parent_stacks(&self) -> &BTreeSet<StackId> {
    &self.parent_stacks
  }

  /// Stacks immediately downstream of this one.
  pub fn child_stacks(&self) -> &BTreeSet<StackId> {
    &self.child_stacks
  }

  /// Number of commits in the chain.
  pub fn len(&self) -> usize {
    self.commits.len()
  }

  /// A stack always holds at least one commit.
  pub fn is_empty(&self) -> bool {
    self.commits.is_empty()
  }
}

/// Classification of a connection between two stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
  /// Plain continuation: one child stack, one parent stack.
  Linear,
  /// The source stack fans out into multiple child stacks.
  Branch,
  /// The target stack joins multiple parent stacks.
  Merge,
}

/// A classified edge between two stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
  pub from: StackId,
  pub to: StackId,
  pub kind: ConnectionKind,
}

/// The commit graph partitioned into stacks plus the classified connections
/// between them.
///
/// Recomputed wholesale from a [`CommitGraph`]; holds no independent state.
#[derive(Debug, Clone, Default)]
pub struct StackGraph {
  stacks: BTreeMap<StackId, Stack>,
  connections: Vec<Connection>,
  root_stacks: Vec<StackId>,
  leaf_stacks: Vec<StackId>,
  stack_by_commit: HashMap<CommitId, StackId>,
}

impl StackGraph {
  /// Partition the commit graph into stacks and classify every boundary
  /// edge.
  ///
  /// Deterministic for identical input: stacks are discovered in commit-id
  /// order and connections are recorded in source-stack order, so repeated
  /// builds yield identical ids and identical connection order.
  pub fn build(graph: &CommitGraph) -> Self {
    let mut stacks: BTreeMap<StackId, Stack> = BTreeMap::new();
    let mut stack_by_commit: HashMap<CommitId, StackId> = HashMap::new();

    // A commit opens a new stack when the chain cannot extend through it:
    // no parent, several parents (merge point), or a parent that fans out.
    let starts_stack = |id: &CommitId| -> bool {
      let parents = graph.parents(id);
      if parents.len() != 1 {
        return true;
      }
      graph.children(&parents[0]).len() > 1
    };

    for id in graph.ids() {
      if !starts_stack(id) {
        continue;
      }

      let stack_id = StackId::new(stacks.len() as u32);
      let mut commits = vec![id.clone()];
      let mut current = id.clone();

      loop {
        let children = graph.children(&current);
        if children.len() != 1 {
          break;
        }
        let next = children[0].clone();
        if graph.parents(&next).len() != 1 {
          break;
        }
        commits.push(next.clone());
        current = next;
      }

      for commit in &commits {
        stack_by_commit.insert(commit.clone(), stack_id);
      }
      stacks.insert(
        stack_id,
        Stack {
          id: stack_id,
          commits,
          parent_stacks: BTreeSet::new(),
          child_stacks: BTreeSet::new(),
        },
      );
    }

    // Boundary edges always leave through a stack's tip; collect them in
    // stack order, then in the tip's child declaration order.
    let mut edges: Vec<(StackId, StackId)> = Vec::new();
    let stack_ids: Vec<StackId> = stacks.keys().copied().collect();
    for stack_id in &stack_ids {
      let tip = stacks[stack_id].tip().clone();
      for child in graph.children(&tip) {
        let child_stack = stack_by_commit[child];
        if child_stack == *stack_id {
          continue;
        }
        edges.push((*stack_id, child_stack));
      }
    }

    for (from, to) in &edges {
      if let Some(stack) = stacks.get_mut(from) {
        stack.child_stacks.insert(*to);
      }
      if let Some(stack) = stacks.get_mut(to) {
        stack.parent_stacks.insert(*from);
      }
    }

    // Branch wins over merge when an edge qualifies as both: the source
    // side's fan-out is what the edge reports.
    let connections = edges
      .into_iter()
      .map(|(from, to)| {
        let kind = if stacks[&from].child_stacks.len() > 1 {
          ConnectionKind::Branch
        } else if stacks[&to].parent_stacks.len() > 1 {
          ConnectionKind::Merge
        } else {
          ConnectionKind::Linear
        };
        Connection { from, to, kind }
      })
      .collect();

    let root_stacks = stacks
      .values()
      .filter(|stack| stack.parent_stacks.is_empty())
      .map(Stack::id)
      .collect();
    let leaf_stacks = stacks
      .values()
      .filter(|stack| stack.child_stacks.is_empty())
      .map(Stack::id)
      .collect();

    Self {
      stacks,
      connections,
      root_stacks,
      leaf_stacks,
      stack_by_commit,
    }
  }

  /// Number of stacks.
  pub fn len(&self) -> usize {
    self.stacks.len()
  }

  /// Returns `true` when the graph holds no stacks.
  pub fn is_empty(&self) -> bool {
    self.stacks.is_empty()
  }

  /// Look up a stack by id.
  pub fn stack(&self, id: StackId) -> Option<&Stack> {
    self.stacks.get(&id)
  }

  /// The stack a commit belongs to, if the commit is known.
  pub fn stack_of(&self, commit: &CommitId) -> Option<StackId> {
    self.stack_by_commit.get(commit).copied()
  }

  /// Iterate over stacks in id order.
  pub fn stacks(&self) -> impl Iterator<Item = &Stack> {
    self.stacks.values()
  }

  /// Classified boundary edges in stable order.
  pub fn connections(&self) -> &[Connection] {
    &self.connections
  }

  /// Stacks with no parent stack, in id order.
  pub fn root_stacks(&self) -> &[StackId] {
    &self.root_stacks
  }

  /// Stacks with no child stack, in id order.
  pub fn leaf_stacks(&self) -> &[StackId] {
    &self.leaf_stacks
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use trellis_test_utils::graph::{graph_from_edges, linear_graph};

  use super::*;

  fn commit_set(graph: &StackGraph) -> Vec<CommitId> {
    let mut all: Vec<CommitId> = graph
      .stacks()
      .flat_map(|stack| stack.commits().iter().cloned())
      .collect();
    all.sort();
    all
  }

  #[test]
  fn single_commit_forms_a_single_stack() {
    let graph = linear_graph(&["a"]);
    let stacks = StackGraph::build(&graph);

    assert_eq!(stacks.len(), 1);
    let only = stacks.stacks().next().unwrap();
    assert_eq!(only.commits(), &[CommitId::from("a")]);
    assert_eq!(stacks.root_stacks(), &[only.id()]);
    assert_eq!(stacks.leaf_stacks(), &[only.id()]);
    assert!(stacks.connections().is_empty());
  }

  #[test]
  fn linear_chain_collapses_into_one_stack() {
    let graph = linear_graph(&["a", "b", "c"]);
    let stacks = StackGraph::build(&graph);

    assert_eq!(stacks.len(), 1);
    let only = stacks.stacks().next().unwrap();
    assert_eq!(
      only.commits(),
      &[CommitId::from("a"), CommitId::from("b"), CommitId::from("c")]
    );
    assert!(stacks.connections().is_empty());
  }

  #[test]
  fn fan_out_splits_into_three_stacks_with_branch_connections() {
    let graph = graph_from_edges(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
    let stacks = StackGraph::build(&graph);

    assert_eq!(stacks.len(), 3);
    let a_stack = stacks.stack_of(&CommitId::from("a")).unwrap();
    assert_eq!(stacks.connections().len(), 2);
    for connection in stacks.connections() {
      assert_eq!(connection.from, a_stack);
      assert_eq!(connection.kind, ConnectionKind::Branch);
    }
  }

  #[test]
  fn merge_point_opens_a_stack_and_classifies_inbound_edges() {
    let graph = graph_from_edges(
      &["a", "b", "c", "d"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );
    let stacks = StackGraph::build(&graph);

    assert_eq!(stacks.len(), 4);
    let d_stack = stacks.stack_of(&CommitId::from("d")).unwrap();
    let inbound: Vec<&Connection> = stacks
      .connections()
      .iter()
      .filter(|connection| connection.to == d_stack)
      .collect();
    assert_eq!(inbound.len(), 2);
    for connection in inbound {
      assert_eq!(connection.kind, ConnectionKind::Merge);
    }
  }

  #[test]
  fn branch_wins_when_an_edge_qualifies_as_both() {
    // a fans out into b and m, and b also feeds m: the a->m edge leaves a
    // branching stack and enters a merging one.
    let graph = graph_from_edges(&["a", "b", "m"], &[("a", "b"), ("a", "m"), ("b", "m")]);
    let stacks = StackGraph::build(&graph);

    let a_stack = stacks.stack_of(&CommitId::from("a")).unwrap();
    let m_stack = stacks.stack_of(&CommitId::from("m")).unwrap();
    let both = stacks
      .connections()
      .iter()
      .find(|connection| connection.from == a_stack && connection.to == m_stack)
      .unwrap();
    assert_eq!(both.kind, ConnectionKind::Branch);
  }

  #[test]
  fn interior_commits_never_branch_or_merge() {
    let graph = graph_from_edges(
      &["a", "b", "c", "d", "e"],
      &[("a", "b"), ("b", "c"), ("b", "d"), ("d", "e")],
    );
    let stacks = StackGraph::build(&graph);

    for stack in stacks.stacks() {
      let commits = stack.commits();
      for (position, commit) in commits.iter().enumerate() {
        if position + 1 < commits.len() {
          assert_eq!(graph.children(commit).len(), 1, "interior commit {commit} branches");
        }
        if position > 0 {
          assert_eq!(graph.parents(commit).len(), 1, "interior commit {commit} merges");
        }
      }
    }
  }

  #[test]
  fn partition_is_complete_and_disjoint() {
    let graph = graph_from_edges(
      &["a", "b", "c", "d", "e", "f"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e"), ("e", "f")],
    );
    let stacks = StackGraph::build(&graph);

    let all = commit_set(&stacks);
    let unique: BTreeSet<&CommitId> = all.iter().collect();
    assert_eq!(unique.len(), all.len(), "a commit appears in two stacks");
    assert_eq!(all.len(), graph.len(), "a commit is missing from the partition");

    for commit in graph.ids() {
      assert!(stacks.stack_of(commit).is_some());
    }
  }

  #[test]
  fn rebuild_is_deterministic() {
    let graph = graph_from_edges(
      &["a", "b", "c", "d"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );
    let first = StackGraph::build(&graph);
    let second = StackGraph::build(&graph);

    assert_eq!(first.connections(), second.connections());
    let first_ids: Vec<(StackId, Vec<CommitId>)> = first
      .stacks()
      .map(|stack| (stack.id(), stack.commits().to_vec()))
      .collect();
    let second_ids: Vec<(StackId, Vec<CommitId>)> = second
      .stacks()
      .map(|stack| (stack.id(), stack.commits().to_vec()))
      .collect();
    assert_eq!(first_ids, second_ids);
  }
}
