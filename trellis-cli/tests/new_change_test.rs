//! End-to-end tests for the create-empty-change trigger.

use assert_cmd::Command;
use predicates::prelude::*;
use trellis_test_utils::git::{GitRepoTestGuard, create_commit};

fn trellis() -> Command {
  Command::cargo_bin("trellis").expect("trellis binary builds")
}

#[test]
fn new_creates_an_empty_change_command() {
  let guard = GitRepoTestGuard::new();
  create_commit(&guard.repo, "a.txt", "one", "first").unwrap();
  let head = guard.repo.head().unwrap().peel_to_commit().unwrap().id().to_string();

  trellis()
    .args(["--colors", "never", "new", &head, "-r"])
    .arg(guard.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("create empty change"));
}

#[test]
fn new_refuses_unknown_commits() {
  let guard = GitRepoTestGuard::new();
  create_commit(&guard.repo, "a.txt", "one", "first").unwrap();

  trellis()
    .args(["--colors", "never", "new", "ffffffff", "-r"])
    .arg(guard.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("no commit matching"));
}
