//! Git-backed commit graph source.
//!
//! Builds the read-only commit graph the core consumes from a real
//! repository: a revwalk over every local branch head plus HEAD, with child
//! links inverted from the parent links git stores. Also provides the
//! diff-stat provider used for per-commit size statistics.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use git2::{BranchType, Repository, Sort};
use tracing::debug;
use trellis_core::commit::{Commit, CommitAuthor, CommitGraph};
use trellis_core::id::{ChangeId, CommitId};
use trellis_core::stats::{CommitStats, StatsProvider};

/// Detect the repository containing the current working directory.
pub fn detect_current_repository() -> Option<PathBuf> {
  let cwd = std::env::current_dir().ok()?;
  let repo = Repository::discover(&cwd).ok()?;
  repo.workdir().map(Path::to_path_buf)
}

/// Open the repository at the given path.
pub fn open_repository(path: &Path) -> Result<Repository> {
  Repository::open(path).with_context(|| format!("Failed to open git repository at {}", path.display()))
}

/// Build the commit graph from every local branch plus HEAD.
///
/// The walk is topological oldest-first so child declaration order is stable
/// for identical repository state.
pub fn build_commit_graph(repo: &Repository) -> Result<CommitGraph> {
  let mut walk = repo.revwalk().context("Failed to start revision walk")?;
  walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;

  if repo.head().is_ok() {
    walk.push_head()?;
  }
  for branch_result in repo.branches(Some(BranchType::Local))? {
    let (branch, _) = branch_result?;
    if let Some(target) = branch.get().target() {
      walk.push(target)?;
    }
  }

  // First pass: collect commits in walk order. Second pass: invert parent
  // links into child lists, preserving walk order per parent.
  let mut commits: Vec<(CommitId, Commit, Vec<CommitId>)> = Vec::new();
  let mut order: Vec<(CommitId, Vec<CommitId>)> = Vec::new();

  for oid_result in walk {
    let oid = oid_result?;
    let commit = repo.find_commit(oid)?;

    let id = CommitId::from(oid.to_string());
    let parents: Vec<CommitId> = commit.parent_ids().map(|parent| CommitId::from(parent.to_string())).collect();

    let message = commit.message().unwrap_or_default();
    let author = commit.author().name().map(str::to_string).unwrap_or_default();
    let seconds = commit.time().seconds();
    let timestamp = Utc.timestamp_opt(seconds, 0).single().unwrap_or(chrono::DateTime::UNIX_EPOCH);

    let snapshot = Commit {
      change_id: change_id_for(&id, message),
      description: message.to_string(),
      author: CommitAuthor { name: author },
      timestamp,
      has_conflicts: false,
    };

    order.push((id.clone(), parents));
    commits.push((id, snapshot, Vec::new()));
  }

  let mut children_of: std::collections::HashMap<CommitId, Vec<CommitId>> = std::collections::HashMap::new();
  for (id, parents) in &order {
    for parent in parents {
      children_of.entry(parent.clone()).or_default().push(id.clone());
    }
  }
  for (id, _, children) in &mut commits {
    if let Some(found) = children_of.remove(id) {
      *children = found;
    }
  }

  debug!(commits = commits.len(), "built commit graph from repository");
  Ok(CommitGraph::from_entries(commits))
}

/// The stable change id for a commit.
///
/// Plain git has no change identity, so a `Change-Id:` message trailer is
/// honoured when present and the commit id itself stands in otherwise.
/// Divergence detection is only meaningful when real change ids are
/// supplied.
fn change_id_for(commit_id: &CommitId, message: &str) -> ChangeId {
  message
    .lines()
    .rev()
    .find_map(|line| line.strip_prefix("Change-Id:"))
    .map(|value| ChangeId::from(value.trim()))
    .unwrap_or_else(|| ChangeId::from(commit_id.as_str()))
}

/// Diff-stat provider backed by a repository path.
///
/// Each call opens its own repository handle: the provider is shared across
/// blocking tasks and `git2::Repository` is not thread-safe.
pub struct GitStatsProvider {
  repo_path: PathBuf,
}

impl GitStatsProvider {
  pub fn new(repo_path: PathBuf) -> Self {
    Self { repo_path }
  }
}

impl StatsProvider for GitStatsProvider {
  fn commit_stats(&self, commit: &CommitId) -> Result<CommitStats> {
    let repo = Repository::open(&self.repo_path)?;
    let oid = git2::Oid::from_str(commit.as_str())?;
    let commit = repo.find_commit(oid)?;

    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
      Ok(parent) => Some(parent.tree()?),
      Err(_) => None,
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let stats = diff.stats()?;

    Ok(CommitStats {
      additions: stats.insertions() as u64,
      deletions: stats.deletions() as u64,
    })
  }
}
