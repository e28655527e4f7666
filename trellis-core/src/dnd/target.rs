//! Drop target resolution.
//!
//! A pure mapping from (drop-zone position, resolved payload) to either a
//! canonical [`DomainCommand`] or an ignore. The command types are decoupled
//! from any view concern so the dispatcher can execute them against the
//! backing engine without reference to where on screen the drop landed.

use serde::Serialize;

use crate::dnd::payload::{DragPayload, FileChange};
use crate::hunk::LineRange;
use crate::id::{BookmarkName, ChangeId, CommitId};

/// Positional target a drag can be released onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropZonePosition {
  /// Insert before (as a parent of) the commit.
  Before(CommitId),
  /// Insert after (as a child of) the commit.
  After(CommitId),
  /// Insert between two adjacent commits.
  Between { before: CommitId, after: CommitId },
  /// Drop onto the commit itself.
  Existing(CommitId),
  /// Start a new branch off the commit.
  NewBranch(CommitId),
}

/// Canonical positional target, decoupled from drop-zone geometry.
///
/// Mirrors [`DropZonePosition`] minus `Existing`: dropping onto an existing
/// commit resolves into commands that name the commit directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "position", rename_all = "kebab-case")]
pub enum CommandTarget {
  Before { commit: CommitId },
  After { commit: CommitId },
  Between { before: CommitId, after: CommitId },
  NewBranch { from: CommitId },
}

/// Where a file or hunk move lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "destination", rename_all = "kebab-case")]
pub enum MoveDestination {
  /// Move into a fresh position described by a command target.
  Position(CommandTarget),
  /// Merge into an existing commit's change set.
  IntoCommit { commit: CommitId },
}

/// A fully resolved history-editing command, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum DomainCommand {
  /// Rebase the dragged commit relative to the target.
  Rebase {
    commit: CommitId,
    change: ChangeId,
    target: CommandTarget,
  },
  /// Squash the dragged commit into an existing commit.
  Squash { from: CommitId, into: CommitId },
  /// Move one file's full change out of its source commit.
  MoveFile {
    file_change: FileChange,
    from: CommitId,
    to: MoveDestination,
  },
  /// Move a single line range of one file out of its source commit.
  MoveHunk {
    path: String,
    range: LineRange,
    from: CommitId,
    to: MoveDestination,
  },
  /// Point a bookmark at a different commit.
  MoveBookmark { bookmark: BookmarkName, to: CommitId },
  /// Create an empty change branching off a commit. Produced by the direct
  /// zero-payload trigger, not by drag resolution.
  CreateEmpty { from: CommitId },
}

/// Outcome of resolving a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// The drop means nothing; no command is created.
  Ignore,
  /// The drop resolves to a command for the dispatcher.
  Command(DomainCommand),
}

impl Resolution {
  /// Returns the command when the drop resolved to one.
  pub fn into_command(self) -> Option<DomainCommand> {
    match self {
      Resolution::Command(command) => Some(command),
      Resolution::Ignore => None,
    }
  }
}

impl DropZonePosition {
  /// The positional command target for this zone, when it has one.
  fn command_target(&self) -> Option<CommandTarget> {
    match self {
      DropZonePosition::Before(commit) => Some(CommandTarget::Before { commit: commit.clone() }),
      DropZonePosition::After(commit) => Some(CommandTarget::After { commit: commit.clone() }),
      DropZonePosition::Between { before, after } => Some(CommandTarget::Between {
        before: before.clone(),
        after: after.clone(),
      }),
      DropZonePosition::NewBranch(commit) => Some(CommandTarget::NewBranch { from: commit.clone() }),
      DropZonePosition::Existing(_) => None,
    }
  }

  /// Returns `true` when the zone is a plain before/after anchor on the
  /// given commit. Between zones are excluded: their anchors describe a gap,
  /// not the commit itself.
  fn is_adjacent_to(&self, commit: &CommitId) -> bool {
    match self {
      DropZonePosition::Before(anchor) | DropZonePosition::After(anchor) => anchor == commit,
      _ => false,
    }
  }
}

/// Resolve a validated drop into a command or an ignore.
///
/// Self-drops are suppressed here rather than left to callers: a change or
/// file-change released immediately before or after its own source commit,
/// or a change squashed into itself, resolves to [`Resolution::Ignore`].
pub fn resolve_drop(zone: &DropZonePosition, payload: &DragPayload) -> Resolution {
  match payload {
    DragPayload::Change { change_id, commit_id } => resolve_change_drop(zone, change_id, commit_id),
    DragPayload::FileChange {
      file_change,
      from_commit_id,
      ..
    } => resolve_file_drop(zone, file_change, from_commit_id),
    DragPayload::Hunk {
      file_path,
      start_line,
      end_line,
      from_commit_id,
    } => resolve_hunk_drop(zone, file_path, *start_line, *end_line, from_commit_id),
    DragPayload::Bookmark { bookmark_name } => match zone {
      DropZonePosition::Existing(commit) => Resolution::Command(DomainCommand::MoveBookmark {
        bookmark: bookmark_name.clone(),
        to: commit.clone(),
      }),
      _ => Resolution::Ignore,
    },
    DragPayload::ExternalFile | DragPayload::ExternalText | DragPayload::Unresolved => Resolution::Ignore,
  }
}

fn resolve_change_drop(zone: &DropZonePosition, change_id: &ChangeId, commit_id: &CommitId) -> Resolution {
  if zone.is_adjacent_to(commit_id) {
    return Resolution::Ignore;
  }
  match zone {
    DropZonePosition::Existing(target) => {
      if target == commit_id {
        return Resolution::Ignore;
      }
      Resolution::Command(DomainCommand::Squash {
        from: commit_id.clone(),
        into: target.clone(),
      })
    }
    _ => match zone.command_target() {
      Some(target) => Resolution::Command(DomainCommand::Rebase {
        commit: commit_id.clone(),
        change: change_id.clone(),
        target,
      }),
      None => Resolution::Ignore,
    },
  }
}

fn resolve_file_drop(zone: &DropZonePosition, file_change: &FileChange, from_commit_id: &CommitId) -> Resolution {
  if zone.is_adjacent_to(from_commit_id) {
    return Resolution::Ignore;
  }
  let to = match zone {
    DropZonePosition::Existing(target) => {
      if target == from_commit_id {
        return Resolution::Ignore;
      }
      MoveDestination::IntoCommit { commit: target.clone() }
    }
    _ => match zone.command_target() {
      Some(target) => MoveDestination::Position(target),
      None => return Resolution::Ignore,
    },
  };
  Resolution::Command(DomainCommand::MoveFile {
    file_change: file_change.clone(),
    from: from_commit_id.clone(),
    to,
  })
}

fn resolve_hunk_drop(
  zone: &DropZonePosition,
  file_path: &str,
  start_line: usize,
  end_line: usize,
  from_commit_id: &CommitId,
) -> Resolution {
  let Some(range) = LineRange::new(start_line, end_line) else {
    return Resolution::Ignore;
  };
  // A hunk released next to its own commit is a split, not a no-op, so no
  // self-drop suppression here.
  let to = match zone {
    DropZonePosition::Existing(target) => MoveDestination::IntoCommit { commit: target.clone() },
    _ => match zone.command_target() {
      Some(target) => MoveDestination::Position(target),
      None => return Resolution::Ignore,
    },
  };
  Resolution::Command(DomainCommand::MoveHunk {
    path: file_path.to_string(),
    range,
    from: from_commit_id.clone(),
    to,
  })
}
