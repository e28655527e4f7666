//! Per-commit size statistics, fetched off the render path.
//!
//! Addition/deletion counts are cosmetic sizing data: they are fetched
//! asynchronously — one request per commit, concurrently across the commits
//! of a stack — and a stack's results are only applied once its whole fetch
//! cycle has completed, so a partially fetched stack never renders
//! half-sized. A fetch raced by a graph refresh can come back naming commits
//! that no longer exist; those results are dropped on apply, never an error.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::debug;

use crate::commit::CommitGraph;
use crate::id::{CommitId, StackId};
use crate::stacks::Stack;

/// Addition and deletion counts for one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitStats {
  pub additions: u64,
  pub deletions: u64,
}

impl CommitStats {
  /// Sum of two counts; used for per-stack totals.
  pub fn saturating_add(self, other: CommitStats) -> CommitStats {
    CommitStats {
      additions: self.additions.saturating_add(other.additions),
      deletions: self.deletions.saturating_add(other.deletions),
    }
  }
}

/// Source of per-commit stats; implementations may fail per commit, which is
/// treated as "no size data", never as an error to surface.
pub trait StatsProvider: Send + Sync + 'static {
  fn commit_stats(&self, commit: &CommitId) -> anyhow::Result<CommitStats>;
}

/// The completed fetch cycle of a single stack, ready for atomic apply.
#[derive(Debug)]
pub struct StackFetch {
  pub stack_id: StackId,
  stats: Vec<(CommitId, CommitStats)>,
}

/// Fetch stats for every commit of a stack, concurrently.
///
/// Each commit gets its own blocking task; commits whose fetch fails are
/// simply absent from the result. The returned [`StackFetch`] represents one
/// complete cycle — apply it as a unit.
pub async fn fetch_stack_stats(provider: Arc<dyn StatsProvider>, stack_id: StackId, commits: Vec<CommitId>) -> StackFetch {
  let mut tasks = JoinSet::new();
  for commit in commits {
    let provider = Arc::clone(&provider);
    tasks.spawn_blocking(move || {
      let stats = provider.commit_stats(&commit);
      (commit, stats)
    });
  }

  let mut stats = Vec::new();
  while let Some(joined) = tasks.join_next().await {
    let Ok((commit, fetched)) = joined else {
      continue;
    };
    match fetched {
      Ok(commit_stats) => stats.push((commit, commit_stats)),
      Err(error) => debug!(commit = %commit, %error, "stat fetch failed; treating as absent"),
    }
  }

  // Join order is completion order; keep the applied set deterministic.
  stats.sort_by(|(a, _), (b, _)| a.cmp(b));
  StackFetch { stack_id, stats }
}

/// Accumulated stats, keyed by commit.
///
/// Holds whatever the completed fetch cycles delivered; commits without an
/// entry render as size-less.
#[derive(Debug, Default)]
pub struct StatsStore {
  by_commit: HashMap<CommitId, CommitStats>,
}

impl StatsStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Apply one stack's completed fetch cycle.
  ///
  /// Results for commits no longer present in the current graph are stale —
  /// a newer refresh superseded the fetch — and are discarded.
  pub fn apply(&mut self, graph: &CommitGraph, fetch: StackFetch) {
    for (commit, stats) in fetch.stats {
      if !graph.contains(&commit) {
        debug!(commit = %commit, stack = %fetch.stack_id, "discarding stale stat result");
        continue;
      }
      self.by_commit.insert(commit, stats);
    }
  }

  /// Stats for one commit, if a fetch delivered them.
  pub fn commit(&self, commit: &CommitId) -> Option<CommitStats> {
    self.by_commit.get(commit).copied()
  }

  /// Total for a stack; absent commits count as empty.
  pub fn stack_total(&self, stack: &Stack) -> CommitStats {
    stack
      .commits()
      .iter()
      .filter_map(|commit| self.commit(commit))
      .fold(CommitStats::default(), CommitStats::saturating_add)
  }
}

#[cfg(test)]
mod tests {
  use anyhow::bail;
  use trellis_test_utils::graph::{graph_from_edges, linear_graph};

  use super::*;
  use crate::stacks::StackGraph;

  struct FixedProvider;

  impl StatsProvider for FixedProvider {
    fn commit_stats(&self, commit: &CommitId) -> anyhow::Result<CommitStats> {
      match commit.as_str() {
        "a" => Ok(CommitStats {
          additions: 10,
          deletions: 2,
        }),
        "b" => Ok(CommitStats {
          additions: 1,
          deletions: 1,
        }),
        _ => bail!("unknown commit"),
      }
    }
  }

  #[tokio::test]
  async fn fetches_a_stack_and_totals_it() {
    let graph = linear_graph(&["a", "b"]);
    let stacks = StackGraph::build(&graph);
    let stack = stacks.stacks().next().unwrap();

    let fetch = fetch_stack_stats(Arc::new(FixedProvider), stack.id(), stack.commits().to_vec()).await;
    let mut store = StatsStore::new();
    store.apply(&graph, fetch);

    assert_eq!(
      store.stack_total(stack),
      CommitStats {
        additions: 11,
        deletions: 3,
      }
    );
  }

  #[tokio::test]
  async fn failed_fetches_leave_commits_size_less() {
    let graph = linear_graph(&["a", "b", "c"]);
    let stacks = StackGraph::build(&graph);
    let stack = stacks.stacks().next().unwrap();

    let fetch = fetch_stack_stats(Arc::new(FixedProvider), stack.id(), stack.commits().to_vec()).await;
    let mut store = StatsStore::new();
    store.apply(&graph, fetch);

    // "c" fails in the provider; the other two still land and the total
    // treats the failure as empty.
    assert!(store.commit(&CommitId::from("c")).is_none());
    assert_eq!(
      store.stack_total(stack),
      CommitStats {
        additions: 11,
        deletions: 3,
      }
    );
  }

  #[tokio::test]
  async fn stale_results_are_discarded_on_apply() {
    let old_graph = linear_graph(&["a", "b"]);
    let stacks = StackGraph::build(&old_graph);
    let stack = stacks.stacks().next().unwrap();
    let fetch = fetch_stack_stats(Arc::new(FixedProvider), stack.id(), stack.commits().to_vec()).await;

    // A refresh replaced the graph while the fetch was in flight; "b" no
    // longer exists.
    let new_graph = graph_from_edges(&["a"], &[]);
    let mut store = StatsStore::new();
    store.apply(&new_graph, fetch);

    assert!(store.commit(&CommitId::from("a")).is_some());
    assert!(store.commit(&CommitId::from("b")).is_none());
  }
}
