//! Git repository management for testing
//!
//! This module provides utilities for creating temporary git repositories
//! seeded with commits and branches, for exercising the CLI end to end.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use git2::{BranchType, Repository, Signature};
use tempfile::TempDir;

/// A test guard that creates a temporary git repository. The repository and
/// its directory are removed when the guard is dropped.
pub struct GitRepoTestGuard {
  /// The temporary directory containing the git repository
  pub temp_dir: TempDir,
  /// The git repository
  pub repo: Repository,
}

impl GitRepoTestGuard {
  /// Create a new test git repository
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let temp_path = temp_dir.path();

    let repo = Repository::init(temp_path).expect("Failed to initialize git repository");

    let mut config = repo.config().expect("Failed to get repository config");
    config
      .set_str("user.name", "Trellis Test User")
      .expect("Failed to set user.name");
    config
      .set_str("user.email", "trellis-test@example.com")
      .expect("Failed to set user.email");

    Self { temp_dir, repo }
  }

  /// Get the path to the git repository
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Get the path to the git repository as an owned value
  pub fn path_buf(&self) -> PathBuf {
    self.temp_dir.path().to_path_buf()
  }
}

impl Default for GitRepoTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

/// Helper function to create a commit in a repository
pub fn create_commit(repo: &Repository, file_name: &str, content: &str, message: &str) -> Result<()> {
  let repo_path = repo.path().parent().expect("repository has a workdir");
  let file_path = repo_path.join(file_name);
  fs::write(&file_path, content)?;

  let mut index = repo.index()?;
  index.add_path(Path::new(file_name))?;
  index.write()?;

  let tree_id = index.write_tree()?;
  let tree = repo.find_tree(tree_id)?;

  let signature = Signature::now("Trellis Test User", "trellis-test@example.com")?;

  if let Ok(head) = repo.head()
    && let Ok(parent) = head.peel_to_commit()
  {
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;
  } else {
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])?;
  }

  Ok(())
}

/// Helper function to create a branch in a repository
pub fn create_branch(repo: &Repository, branch_name: &str, start_point: Option<&str>) -> Result<()> {
  let head = if let Some(start) = start_point {
    repo
      .find_branch(start, BranchType::Local)?
      .into_reference()
      .peel_to_commit()?
  } else {
    repo.head()?.peel_to_commit()?
  };

  repo.branch(branch_name, &head, false)?;
  Ok(())
}

/// Helper function to checkout a branch
pub fn checkout_branch(repo: &Repository, branch_name: &str) -> Result<()> {
  let obj = repo
    .revparse_single(&format!("refs/heads/{branch_name}"))?
    .peel_to_commit()?;

  repo.checkout_tree(&obj.into_object(), None)?;
  repo.set_head(&format!("refs/heads/{branch_name}"))?;

  Ok(())
}
