//! End-to-end tests for the stacks view.

use assert_cmd::Command;
use predicates::prelude::*;
use trellis_test_utils::git::{GitRepoTestGuard, checkout_branch, create_branch, create_commit};

fn trellis() -> Command {
  Command::cargo_bin("trellis").expect("trellis binary builds")
}

#[test]
fn linear_history_renders_one_stack() {
  let guard = GitRepoTestGuard::new();
  create_commit(&guard.repo, "a.txt", "one", "first").unwrap();
  create_commit(&guard.repo, "b.txt", "two", "second").unwrap();
  create_commit(&guard.repo, "c.txt", "three", "third").unwrap();

  trellis()
    .args(["--colors", "never", "stacks", "-r"])
    .arg(guard.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("level 0"))
    .stdout(predicate::str::contains("3 commits"))
    .stdout(predicate::str::contains("third"))
    .stdout(predicate::str::is_match("level 1").unwrap().not());
}

#[test]
fn branched_history_shows_connections_and_groups() {
  let guard = GitRepoTestGuard::new();
  create_commit(&guard.repo, "base.txt", "base", "base").unwrap();
  create_branch(&guard.repo, "feature", None).unwrap();
  create_commit(&guard.repo, "main.txt", "main", "main work").unwrap();
  checkout_branch(&guard.repo, "feature").unwrap();
  create_commit(&guard.repo, "feature.txt", "feature", "feature work").unwrap();

  trellis()
    .args(["--colors", "never", "stacks", "-r"])
    .arg(guard.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("level 0"))
    .stdout(predicate::str::contains("level 1"))
    .stdout(predicate::str::contains("connections"))
    .stdout(predicate::str::contains("branch"))
    .stdout(predicate::str::contains("∥ group 0"));
}

#[test]
fn stats_flag_adds_size_counts() {
  let guard = GitRepoTestGuard::new();
  create_commit(&guard.repo, "a.txt", "one\ntwo\n", "first").unwrap();

  trellis()
    .args(["--colors", "never", "stacks", "--stats", "-r"])
    .arg(guard.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("+2"));
}

#[test]
fn missing_repository_fails_with_context() {
  trellis()
    .args(["--colors", "never", "stacks", "-r", "/nonexistent/repo"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to open git repository"));
}
