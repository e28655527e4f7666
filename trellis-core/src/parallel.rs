//! Parallel group detection.
//!
//! Sibling stacks under a common parent that have no ancestry relation
//! between them represent concurrently developed lines of work; the view
//! emphasises them as a group. Membership is display-only and never feeds
//! back into the stack partition or the layout.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::id::StackId;
use crate::stacks::StackGraph;

/// Stacks that are siblings under a common parent with no mutual ancestry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelGroup {
  pub id: usize,
  pub stack_ids: BTreeSet<StackId>,
}

impl ParallelGroup {
  /// Returns `true` when the stack belongs to this group.
  pub fn contains(&self, stack: StackId) -> bool {
    self.stack_ids.contains(&stack)
  }
}

/// Detect all parallel groups in the stack graph.
///
/// For each parent stack, siblings are grouped greedily in id order: a
/// sibling joins the current group only when it has no ancestry relation with
/// any member already in it, and leftovers seed further groups. The ancestry
/// requirement keeps diamond arms parallel only for the span before their
/// merge point: the merge stack descends from both arms and never joins their
/// group.
pub fn detect_parallel_groups(graph: &StackGraph) -> Vec<ParallelGroup> {
  let mut groups: Vec<BTreeSet<StackId>> = Vec::new();

  for parent in graph.stacks() {
    let siblings: Vec<StackId> = parent.child_stacks().iter().copied().collect();
    if siblings.len() < 2 {
      continue;
    }

    let mut remaining: VecDeque<StackId> = siblings.into();
    while let Some(seed) = remaining.pop_front() {
      let mut members = BTreeSet::from([seed]);
      let mut rest = VecDeque::new();
      while let Some(candidate) = remaining.pop_front() {
        let unrelated = members
          .iter()
          .all(|member| !related_by_ancestry(graph, *member, candidate));
        if unrelated {
          members.insert(candidate);
        } else {
          rest.push_back(candidate);
        }
      }
      remaining = rest;

      if members.len() >= 2 && !groups.contains(&members) {
        groups.push(members);
      }
    }
  }

  groups
    .into_iter()
    .enumerate()
    .map(|(id, stack_ids)| ParallelGroup { id, stack_ids })
    .collect()
}

/// Returns `true` when either stack is a transitive ancestor of the other.
fn related_by_ancestry(graph: &StackGraph, a: StackId, b: StackId) -> bool {
  is_ancestor(graph, a, b) || is_ancestor(graph, b, a)
}

/// Returns `true` when `descendant` is reachable from `ancestor` through
/// child edges.
fn is_ancestor(graph: &StackGraph, ancestor: StackId, descendant: StackId) -> bool {
  if ancestor == descendant {
    return false;
  }

  let mut to_visit = vec![ancestor];
  let mut visited = HashSet::new();

  while let Some(current) = to_visit.pop() {
    if !visited.insert(current) {
      continue;
    }
    let Some(stack) = graph.stack(current) else {
      continue;
    };
    for child in stack.child_stacks() {
      if *child == descendant {
        return true;
      }
      to_visit.push(*child);
    }
  }

  false
}

#[cfg(test)]
mod tests {
  use trellis_test_utils::graph::{graph_from_edges, linear_graph};

  use super::*;
  use crate::id::CommitId;

  #[test]
  fn fan_out_children_form_one_group() {
    let commit_graph = graph_from_edges(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
    let stacks = StackGraph::build(&commit_graph);
    let groups = detect_parallel_groups(&stacks);

    assert_eq!(groups.len(), 1);
    let b_stack = stacks.stack_of(&CommitId::from("b")).unwrap();
    let c_stack = stacks.stack_of(&CommitId::from("c")).unwrap();
    assert!(groups[0].contains(b_stack));
    assert!(groups[0].contains(c_stack));
  }

  #[test]
  fn linear_history_has_no_groups() {
    let commit_graph = linear_graph(&["a", "b", "c"]);
    let stacks = StackGraph::build(&commit_graph);

    assert!(detect_parallel_groups(&stacks).is_empty());
  }

  #[test]
  fn diamond_arms_are_parallel_but_the_merge_is_not() {
    let commit_graph = graph_from_edges(
      &["a", "b", "c", "d"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );
    let stacks = StackGraph::build(&commit_graph);
    let groups = detect_parallel_groups(&stacks);

    assert_eq!(groups.len(), 1);
    let b_stack = stacks.stack_of(&CommitId::from("b")).unwrap();
    let c_stack = stacks.stack_of(&CommitId::from("c")).unwrap();
    let d_stack = stacks.stack_of(&CommitId::from("d")).unwrap();
    assert!(groups[0].contains(b_stack));
    assert!(groups[0].contains(c_stack));
    assert!(!groups[0].contains(d_stack));
  }

  #[test]
  fn sibling_that_feeds_its_sibling_is_excluded() {
    // a fans out into b and m, and b also feeds m: b and m are siblings
    // under a, but b is an ancestor of m.
    let commit_graph = graph_from_edges(&["a", "b", "m"], &[("a", "b"), ("a", "m"), ("b", "m")]);
    let stacks = StackGraph::build(&commit_graph);

    assert!(detect_parallel_groups(&stacks).is_empty());
  }

  #[test]
  fn three_way_fan_out_groups_all_siblings() {
    let commit_graph = graph_from_edges(&["a", "b", "c", "d"], &[("a", "b"), ("a", "c"), ("a", "d")]);
    let stacks = StackGraph::build(&commit_graph);
    let groups = detect_parallel_groups(&stacks);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].stack_ids.len(), 3);
  }

  #[test]
  fn grouping_leaves_the_partition_untouched() {
    let commit_graph = graph_from_edges(
      &["a", "b", "c", "d"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );
    let before = StackGraph::build(&commit_graph);
    let before_stacks: Vec<Vec<CommitId>> = before.stacks().map(|stack| stack.commits().to_vec()).collect();

    let _ = detect_parallel_groups(&before);

    let after_stacks: Vec<Vec<CommitId>> = before.stacks().map(|stack| stack.commits().to_vec()).collect();
    assert_eq!(before_stacks, after_stacks);
  }
}
