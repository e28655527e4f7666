//! Command dispatchers for the CLI surface.
//!
//! Resolution and execution are separate concerns: the core hands over a
//! [`DomainCommand`] and a dispatcher decides what to do with it. The CLI
//! ships a preview dispatcher that describes the command it would hand to
//! the backing engine instead of mutating anything.

use trellis_core::dispatch::CommandDispatcher;
use trellis_core::dnd::target::{CommandTarget, DomainCommand, MoveDestination};
use trellis_core::output::{format_commit_id, print_success};

/// Describes resolved commands on stdout without executing them.
#[derive(Debug, Default)]
pub struct PreviewDispatcher;

impl CommandDispatcher for PreviewDispatcher {
  fn dispatch(&self, command: &DomainCommand) -> anyhow::Result<()> {
    print_success(&describe(command));
    Ok(())
  }
}

/// One-line human description of a command.
pub fn describe(command: &DomainCommand) -> String {
  match command {
    DomainCommand::Rebase { commit, target, .. } => {
      format!("rebase {} {}", format_commit_id(short(commit.as_str())), describe_target(target))
    }
    DomainCommand::Squash { from, into } => format!(
      "squash {} into {}",
      format_commit_id(short(from.as_str())),
      format_commit_id(short(into.as_str()))
    ),
    DomainCommand::MoveFile { file_change, from, to } => format!(
      "move {} from {} {}",
      file_change.path,
      format_commit_id(short(from.as_str())),
      describe_destination(to)
    ),
    DomainCommand::MoveHunk { path, range, from, to } => format!(
      "move {}:{}-{} from {} {}",
      path,
      range.start,
      range.end,
      format_commit_id(short(from.as_str())),
      describe_destination(to)
    ),
    DomainCommand::MoveBookmark { bookmark, to } => {
      format!("move bookmark {} to {}", bookmark, format_commit_id(short(to.as_str())))
    }
    DomainCommand::CreateEmpty { from } => {
      format!("create empty change off {}", format_commit_id(short(from.as_str())))
    }
  }
}

fn describe_target(target: &CommandTarget) -> String {
  match target {
    CommandTarget::Before { commit } => format!("before {}", format_commit_id(short(commit.as_str()))),
    CommandTarget::After { commit } => format!("after {}", format_commit_id(short(commit.as_str()))),
    CommandTarget::Between { before, after } => format!(
      "between {} and {}",
      format_commit_id(short(before.as_str())),
      format_commit_id(short(after.as_str()))
    ),
    CommandTarget::NewBranch { from } => format!("onto a new branch off {}", format_commit_id(short(from.as_str()))),
  }
}

fn describe_destination(to: &MoveDestination) -> String {
  match to {
    MoveDestination::Position(target) => describe_target(target),
    MoveDestination::IntoCommit { commit } => format!("into {}", format_commit_id(short(commit.as_str()))),
  }
}

fn short(id: &str) -> &str {
  &id[..id.len().min(12)]
}
