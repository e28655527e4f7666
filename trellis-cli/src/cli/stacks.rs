//! # Stacks Command
//!
//! Renders the repository's commit history as connected stacks: the commit
//! graph is rebuilt wholesale, partitioned, classified, and laid out on
//! every invocation.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::task::JoinSet;
use trellis_core::commit::CommitGraph;
use trellis_core::divergence::divergent_changes;
use trellis_core::layout::StackLayout;
use trellis_core::parallel::detect_parallel_groups;
use trellis_core::stacks::StackGraph;
use trellis_core::stats::{StatsProvider, StatsStore, fetch_stack_stats};

use crate::git::{GitStatsProvider, build_commit_graph, detect_current_repository, open_repository};
use crate::render::StackViewRenderer;

/// Render the stack view of the repository
#[derive(Args)]
pub struct StacksArgs {
  /// Path to a specific repository
  #[arg(long, short = 'r', value_name = "PATH")]
  pub repo: Option<String>,

  /// Fetch and display addition/deletion counts per stack
  #[arg(long)]
  pub stats: bool,
}

pub fn handle_stacks_command(args: StacksArgs) -> Result<()> {
  let repo_path = resolve_repo_path(args.repo.as_deref())?;
  let repo = open_repository(&repo_path)?;

  let commit_graph = build_commit_graph(&repo)?;
  let stack_graph = StackGraph::build(&commit_graph);
  let layout = StackLayout::compute(&stack_graph);
  let groups = detect_parallel_groups(&stack_graph);
  let divergent = divergent_changes(&commit_graph);

  let stats = if args.stats {
    Some(collect_stats(&repo_path, &commit_graph, &stack_graph)?)
  } else {
    None
  };

  let renderer = StackViewRenderer::new(
    &commit_graph,
    &stack_graph,
    &layout,
    &groups,
    &divergent,
    stats.as_ref(),
  );
  let mut stdout = io::stdout();
  renderer.render(&mut stdout)?;

  Ok(())
}

/// Resolve the repository path from the argument or the working directory.
pub fn resolve_repo_path(repo_arg: Option<&str>) -> Result<PathBuf> {
  match repo_arg {
    Some(path) => Ok(PathBuf::from(path)),
    None => detect_current_repository().context("Not in a git repository"),
  }
}

/// Fetch stats for every stack concurrently and apply each stack's results
/// as a unit.
fn collect_stats(repo_path: &Path, commit_graph: &CommitGraph, stack_graph: &StackGraph) -> Result<StatsStore> {
  let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
  let provider: Arc<dyn StatsProvider> = Arc::new(GitStatsProvider::new(repo_path.to_path_buf()));

  runtime.block_on(async {
    let mut tasks = JoinSet::new();
    for stack in stack_graph.stacks() {
      tasks.spawn(fetch_stack_stats(
        Arc::clone(&provider),
        stack.id(),
        stack.commits().to_vec(),
      ));
    }

    let mut store = StatsStore::new();
    while let Some(joined) = tasks.join_next().await {
      if let Ok(fetch) = joined {
        store.apply(commit_graph, fetch);
      }
    }
    Ok(store)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn explicit_repo_path_wins_over_detection() {
    let path = resolve_repo_path(Some("/some/repo")).unwrap();
    assert_eq!(path, PathBuf::from("/some/repo"));
  }
}
