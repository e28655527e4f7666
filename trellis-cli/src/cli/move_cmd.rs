//! # Move Command
//!
//! Resolves a rearrangement gesture from command-line flags: the payload
//! flags model what was picked up, the target flags model the drop zone, and
//! the result is the canonical command the gesture would dispatch.

use anyhow::{Context, Result, bail};
use clap::Args;
use trellis_core::commit::CommitGraph;
use trellis_core::dispatch::{CommandGate, dispatch_guarded};
use trellis_core::dnd::payload::{DragPayload, FileChange, FileStatus, TransferData, resolve_payload};
use trellis_core::dnd::session::DragSession;
use trellis_core::dnd::target::{DropZonePosition, Resolution, resolve_drop};
use trellis_core::hunk::parse_range_spec;
use trellis_core::id::{BookmarkName, CommitId};
use trellis_core::output::print_warning;

use crate::cli::stacks::resolve_repo_path;
use crate::dispatcher::PreviewDispatcher;
use crate::git::{build_commit_graph, open_repository};

/// Output format for the resolved command
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  /// Human-readable preview
  Text,
  /// Machine-readable JSON
  Json,
}

/// Resolve a rearrangement gesture into a canonical command
#[derive(Args)]
pub struct MoveArgs {
  /// Drag a whole change: the commit to move
  #[arg(long, value_name = "COMMIT")]
  pub change: Option<String>,

  /// Drag one file's change out of a commit (requires --from)
  #[arg(long, value_name = "PATH")]
  pub file: Option<String>,

  /// Status letter of the dragged file (M, A, D, R, or C)
  #[arg(long, value_name = "STATUS", default_value = "M")]
  pub status: String,

  /// Drag a line range of one file out of a commit (requires --from)
  #[arg(long, value_name = "PATH:START-END")]
  pub hunk: Option<String>,

  /// Drag a bookmark
  #[arg(long, value_name = "NAME")]
  pub bookmark: Option<String>,

  /// Raw transfer payload as JSON, exercised through the parser chain
  #[arg(long, value_name = "JSON")]
  pub payload: Option<String>,

  /// Source commit for --file and --hunk
  #[arg(long, value_name = "COMMIT")]
  pub from: Option<String>,

  /// Drop before (as a parent of) this commit
  #[arg(long, value_name = "COMMIT")]
  pub before: Option<String>,

  /// Drop after (as a child of) this commit
  #[arg(long, value_name = "COMMIT")]
  pub after: Option<String>,

  /// Drop between two adjacent commits
  #[arg(long, num_args = 2, value_names = ["BEFORE", "AFTER"])]
  pub between: Option<Vec<String>>,

  /// Drop onto this existing commit
  #[arg(long, value_name = "COMMIT")]
  pub onto: Option<String>,

  /// Drop onto a new branch off this commit
  #[arg(long = "new-branch", value_name = "COMMIT")]
  pub new_branch: Option<String>,

  /// Output format for the resolved command
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  pub format: OutputFormat,

  /// Path to a specific repository
  #[arg(long, short = 'r', value_name = "PATH")]
  pub repo: Option<String>,
}

pub fn handle_move_command(args: MoveArgs) -> Result<()> {
  let repo_path = resolve_repo_path(args.repo.as_deref())?;
  let repo = open_repository(&repo_path)?;
  let commit_graph = build_commit_graph(&repo)?;

  // The gesture model: a payload recorded at drag start is authoritative;
  // a raw transfer only matters when no structured payload was picked up.
  let mut session = DragSession::new();
  if let Some(payload) = build_payload(&args, &commit_graph)? {
    session.start(payload);
  }
  let transfer = args
    .payload
    .as_deref()
    .map(TransferData::with_text)
    .unwrap_or_default();
  let payload = resolve_payload(&session, &transfer);
  session.complete();

  let zone = build_drop_zone(&args, &commit_graph)?;

  match resolve_drop(&zone, &payload) {
    Resolution::Ignore => {
      print_warning("gesture resolves to no command");
    }
    Resolution::Command(command) => match args.format {
      OutputFormat::Text => {
        let gate = CommandGate::new();
        dispatch_guarded(&gate, &PreviewDispatcher, &command)?;
      }
      OutputFormat::Json => {
        println!("{}", serde_json::to_string_pretty(&command)?);
      }
    },
  }

  Ok(())
}

/// Build the structured payload selected by the flags, if any.
fn build_payload(args: &MoveArgs, graph: &CommitGraph) -> Result<Option<DragPayload>> {
  let selected = [
    args.change.is_some(),
    args.file.is_some(),
    args.hunk.is_some(),
    args.bookmark.is_some(),
    args.payload.is_some(),
  ]
  .iter()
  .filter(|flag| **flag)
  .count();
  if selected == 0 {
    bail!("pick a payload: --change, --file, --hunk, --bookmark, or --payload");
  }
  if selected > 1 {
    bail!("pick exactly one payload");
  }

  if let Some(change) = args.change.as_deref() {
    let commit_id = resolve_commit(graph, change)?;
    let commit = graph
      .get(&commit_id)
      .with_context(|| format!("commit {commit_id} vanished from the graph"))?;
    return Ok(Some(DragPayload::Change {
      change_id: commit.change_id.clone(),
      commit_id,
    }));
  }

  if let Some(file) = args.file.as_deref() {
    let from = source_commit(args, graph)?;
    let commit = graph
      .get(&from)
      .with_context(|| format!("commit {from} vanished from the graph"))?;
    return Ok(Some(DragPayload::FileChange {
      file_change: FileChange {
        path: file.to_string(),
        status: parse_status(&args.status)?,
        additions: None,
        deletions: None,
      },
      from_change_id: commit.change_id.clone(),
      from_commit_id: from,
    }));
  }

  if let Some(hunk) = args.hunk.as_deref() {
    let from = source_commit(args, graph)?;
    let (path, range) = parse_range_spec(hunk)?;
    return Ok(Some(DragPayload::Hunk {
      file_path: path,
      start_line: range.start,
      end_line: range.end,
      from_commit_id: from,
    }));
  }

  if let Some(bookmark) = args.bookmark.as_deref() {
    return Ok(Some(DragPayload::Bookmark {
      bookmark_name: BookmarkName::from(bookmark),
    }));
  }

  // --payload: handled by the raw transfer, not the session.
  Ok(None)
}

/// Build the drop zone selected by the target flags.
fn build_drop_zone(args: &MoveArgs, graph: &CommitGraph) -> Result<DropZonePosition> {
  let mut zones = Vec::new();

  if let Some(before) = args.before.as_deref() {
    zones.push(DropZonePosition::Before(resolve_commit(graph, before)?));
  }
  if let Some(after) = args.after.as_deref() {
    zones.push(DropZonePosition::After(resolve_commit(graph, after)?));
  }
  if let Some(between) = args.between.as_deref() {
    // clap enforces exactly two values.
    zones.push(DropZonePosition::Between {
      before: resolve_commit(graph, &between[0])?,
      after: resolve_commit(graph, &between[1])?,
    });
  }
  if let Some(onto) = args.onto.as_deref() {
    zones.push(DropZonePosition::Existing(resolve_commit(graph, onto)?));
  }
  if let Some(new_branch) = args.new_branch.as_deref() {
    zones.push(DropZonePosition::NewBranch(resolve_commit(graph, new_branch)?));
  }

  match zones.len() {
    0 => bail!("pick a target: --before, --after, --between, --onto, or --new-branch"),
    1 => Ok(zones.remove(0)),
    _ => bail!("pick exactly one target"),
  }
}

fn source_commit(args: &MoveArgs, graph: &CommitGraph) -> Result<CommitId> {
  let from = args
    .from
    .as_deref()
    .context("--file and --hunk need --from <COMMIT>")?;
  resolve_commit(graph, from)
}

/// Resolve a commit id or unambiguous prefix against the graph.
pub fn resolve_commit(graph: &CommitGraph, spec: &str) -> Result<CommitId> {
  if spec.is_empty() {
    bail!("empty commit id");
  }
  let matches: Vec<&CommitId> = graph.ids().filter(|id| id.as_str().starts_with(spec)).collect();
  match matches.len() {
    0 => bail!("no commit matching '{spec}'"),
    1 => Ok(matches[0].clone()),
    _ => bail!("ambiguous commit prefix '{spec}'"),
  }
}

fn parse_status(status: &str) -> Result<FileStatus> {
  match status.to_ascii_uppercase().as_str() {
    "M" => Ok(FileStatus::Modified),
    "A" => Ok(FileStatus::Added),
    "D" => Ok(FileStatus::Deleted),
    "R" => Ok(FileStatus::Renamed),
    "C" => Ok(FileStatus::Copied),
    other => bail!("unknown file status '{other}', expected one of M, A, D, R, C"),
  }
}

#[cfg(test)]
mod tests {
  use trellis_test_utils::graph::graph_from_edges;

  use super::*;

  #[test]
  fn resolves_unique_prefixes() {
    let graph = graph_from_edges(&["abc1", "abd2"], &[]);
    assert_eq!(resolve_commit(&graph, "abc").unwrap(), CommitId::from("abc1"));
    assert!(resolve_commit(&graph, "ab").is_err());
    assert!(resolve_commit(&graph, "zz").is_err());
    assert!(resolve_commit(&graph, "").is_err());
  }

  #[test]
  fn parses_status_letters() {
    assert_eq!(parse_status("M").unwrap(), FileStatus::Modified);
    assert_eq!(parse_status("a").unwrap(), FileStatus::Added);
    assert!(parse_status("X").is_err());
  }
}
