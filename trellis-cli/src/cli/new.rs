//! # New Command
//!
//! The direct "create empty change here" trigger: no drag, no payload, just
//! a new-branch target. Goes through the single-flight command gate like
//! every other command, and is refused while one is already executing.

use anyhow::Result;
use clap::Args;
use trellis_core::dispatch::{CommandGate, DispatchError, create_empty_change};
use trellis_core::output::print_warning;

use crate::cli::move_cmd::resolve_commit;
use crate::cli::stacks::resolve_repo_path;
use crate::dispatcher::PreviewDispatcher;
use crate::git::{build_commit_graph, open_repository};

/// Create an empty change branching off a commit
#[derive(Args)]
pub struct NewArgs {
  /// The commit to branch the empty change off
  #[arg(required = true, index = 1, value_name = "COMMIT")]
  pub from: String,

  /// Path to a specific repository
  #[arg(long, short = 'r', value_name = "PATH")]
  pub repo: Option<String>,
}

pub fn handle_new_command(args: NewArgs) -> Result<()> {
  let repo_path = resolve_repo_path(args.repo.as_deref())?;
  let repo = open_repository(&repo_path)?;
  let commit_graph = build_commit_graph(&repo)?;

  let from = resolve_commit(&commit_graph, &args.from)?;

  let gate = CommandGate::new();
  match create_empty_change(&gate, &PreviewDispatcher, from) {
    Ok(()) => Ok(()),
    Err(DispatchError::Busy) => {
      print_warning("another command is already executing; try again when it finishes");
      Ok(())
    }
    Err(error) => Err(error.into()),
  }
}
