//! Layered layout of the stack graph.
//!
//! Every stack is assigned an integer level (0 = root) by a breadth-first
//! traversal that starts from all root stacks at once. The assignment is
//! first-seen-wins: a stack already levelled is never revisited, so a stack
//! reachable through parents at different depths takes the level of whichever
//! parent's frontier reached it first. That is a deliberate simplification —
//! diamond shapes can place a descendant closer to the shorter arm than a
//! longest-path layering would — and is kept as-is.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::id::StackId;
use crate::stacks::StackGraph;

/// Stable level assignment for rendering the stack graph top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackLayout {
  levels: Vec<Vec<StackId>>,
  level_by_stack: HashMap<StackId, usize>,
}

impl StackLayout {
  /// Compute levels for the graph.
  ///
  /// Roots enter the frontier in root order at level 0; each stack's
  /// children are enqueued in child order at the parent's level plus one.
  /// The per-level order is exactly the enqueue order, so repeated
  /// computation over the same graph yields identical output.
  pub fn compute(graph: &StackGraph) -> Self {
    let mut levels: Vec<Vec<StackId>> = Vec::new();
    let mut level_by_stack: HashMap<StackId, usize> = HashMap::new();
    let mut queue: VecDeque<(StackId, usize)> = VecDeque::new();
    let mut seen: HashSet<StackId> = HashSet::new();

    for root in graph.root_stacks() {
      if seen.insert(*root) {
        queue.push_back((*root, 0));
      }
    }

    while let Some((stack_id, level)) = queue.pop_front() {
      if levels.len() <= level {
        levels.resize_with(level + 1, Vec::new);
      }
      levels[level].push(stack_id);
      level_by_stack.insert(stack_id, level);

      let Some(stack) = graph.stack(stack_id) else {
        continue;
      };
      for child in stack.child_stacks() {
        if seen.insert(*child) {
          queue.push_back((*child, level + 1));
        }
      }
    }

    Self { levels, level_by_stack }
  }

  /// Levels in render order; index is the level number.
  pub fn levels(&self) -> &[Vec<StackId>] {
    &self.levels
  }

  /// The level assigned to a stack, if it was reachable from a root.
  pub fn level_of(&self, stack: StackId) -> Option<usize> {
    self.level_by_stack.get(&stack).copied()
  }

  /// Number of levels.
  pub fn depth(&self) -> usize {
    self.levels.len()
  }

  /// Returns `true` when the layout holds no stacks.
  pub fn is_empty(&self) -> bool {
    self.levels.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use trellis_test_utils::graph::{graph_from_edges, linear_graph};

  use super::*;
  use crate::id::CommitId;

  #[test]
  fn linear_history_is_a_single_level() {
    let commit_graph = linear_graph(&["a", "b", "c"]);
    let stacks = StackGraph::build(&commit_graph);
    let layout = StackLayout::compute(&stacks);

    assert_eq!(layout.depth(), 1);
    assert_eq!(layout.levels()[0].len(), 1);
  }

  #[test]
  fn fan_out_children_land_one_level_below_the_root() {
    let commit_graph = graph_from_edges(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
    let stacks = StackGraph::build(&commit_graph);
    let layout = StackLayout::compute(&stacks);

    let a_stack = stacks.stack_of(&CommitId::from("a")).unwrap();
    let b_stack = stacks.stack_of(&CommitId::from("b")).unwrap();
    let c_stack = stacks.stack_of(&CommitId::from("c")).unwrap();

    assert_eq!(layout.level_of(a_stack), Some(0));
    assert_eq!(layout.level_of(b_stack), Some(1));
    assert_eq!(layout.level_of(c_stack), Some(1));
    assert_eq!(layout.levels()[1], vec![b_stack, c_stack]);
  }

  #[test]
  fn first_seen_wins_on_uneven_diamonds() {
    // Two arms of different stack length into d: the short arm's frontier
    // reaches the merge stack first, so d sits at level 2 rather than at the
    // longest-path level 3. The long arm passes through c, which fans out
    // into x and y and therefore spans two stacks.
    let commit_graph = graph_from_edges(
      &["a", "b", "c", "d", "x", "y"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "x"), ("c", "y"), ("x", "d")],
    );
    let stacks = StackGraph::build(&commit_graph);
    let layout = StackLayout::compute(&stacks);

    let d_stack = stacks.stack_of(&CommitId::from("d")).unwrap();
    assert_eq!(layout.level_of(d_stack), Some(2));
  }

  #[test]
  fn disconnected_roots_both_start_at_level_zero() {
    let commit_graph = graph_from_edges(&["a", "b", "p", "q"], &[("a", "b"), ("p", "q")]);
    let stacks = StackGraph::build(&commit_graph);
    let layout = StackLayout::compute(&stacks);

    assert_eq!(layout.depth(), 1);
    assert_eq!(layout.levels()[0].len(), 2);
  }

  #[test]
  fn layout_is_deterministic() {
    let commit_graph = graph_from_edges(
      &["a", "b", "c", "d", "e"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")],
    );
    let stacks = StackGraph::build(&commit_graph);

    let first = StackLayout::compute(&stacks);
    let second = StackLayout::compute(&stacks);
    assert_eq!(first, second);
  }

  #[test]
  fn every_stack_is_levelled() {
    let commit_graph = graph_from_edges(
      &["a", "b", "c", "d"],
      &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );
    let stacks = StackGraph::build(&commit_graph);
    let layout = StackLayout::compute(&stacks);

    for stack in stacks.stacks() {
      assert!(layout.level_of(stack.id()).is_some(), "stack {} missing", stack.id());
    }
  }
}
