//! Drag payload resolution.
//!
//! A drag can originate inside the application (a commit card, a file row, a
//! diff hunk, a bookmark chip) or outside it (a file or text dragged in from
//! elsewhere). Whatever arrives, resolution is total: it yields exactly one
//! [`DragPayload`] variant and never fails. Structured payloads are parsed by
//! an explicit try-in-order chain — one typed parser per kind, each
//! validating shape and falling through on any mismatch.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dnd::session::DragSession;
use crate::id::{BookmarkName, ChangeId, CommitId};

/// Status letter of a changed file, as the diff layer reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
  #[serde(rename = "M")]
  Modified,
  #[serde(rename = "A")]
  Added,
  #[serde(rename = "D")]
  Deleted,
  #[serde(rename = "R")]
  Renamed,
  #[serde(rename = "C")]
  Copied,
}

/// A changed file as carried inside a file-change payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
  pub path: String,
  pub status: FileStatus,
  #[serde(default)]
  pub additions: Option<u64>,
  #[serde(default)]
  pub deletions: Option<u64>,
}

/// The single resolved meaning of an in-flight drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
  /// A whole change (commit) is being dragged.
  Change { change_id: ChangeId, commit_id: CommitId },
  /// One file's full change, lifted out of its source commit.
  FileChange {
    file_change: FileChange,
    from_change_id: ChangeId,
    from_commit_id: CommitId,
  },
  /// A single line range of one file.
  Hunk {
    file_path: String,
    start_line: usize,
    end_line: usize,
    from_commit_id: CommitId,
  },
  /// A bookmark chip.
  Bookmark { bookmark_name: BookmarkName },
  /// Foreign drag declaring file content.
  ExternalFile,
  /// Foreign drag declaring plain text.
  ExternalText,
  /// Nothing recognizable.
  Unresolved,
}

impl DragPayload {
  /// The commit the payload was lifted from, when it has one.
  pub fn source_commit(&self) -> Option<&CommitId> {
    match self {
      DragPayload::Change { commit_id, .. } => Some(commit_id),
      DragPayload::FileChange { from_commit_id, .. } => Some(from_commit_id),
      DragPayload::Hunk { from_commit_id, .. } => Some(from_commit_id),
      DragPayload::Bookmark { .. }
      | DragPayload::ExternalFile
      | DragPayload::ExternalText
      | DragPayload::Unresolved => None,
    }
  }

  /// Returns `true` for payloads that can never produce a command.
  pub fn is_inert(&self) -> bool {
    matches!(
      self,
      DragPayload::ExternalFile | DragPayload::ExternalText | DragPayload::Unresolved
    )
  }
}

/// Content kind a raw transfer declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
  File,
  Text,
}

/// Raw transfer contents available at the moment of a drag event.
#[derive(Debug, Clone, Default)]
pub struct TransferData {
  /// Structured or plain text payload, if the transfer carries one.
  pub text: Option<String>,
  /// Content kinds the transfer declares, in declaration order.
  pub kinds: Vec<TransferKind>,
}

impl TransferData {
  /// A transfer carrying only a text payload.
  pub fn with_text(text: impl Into<String>) -> Self {
    Self {
      text: Some(text.into()),
      kinds: vec![TransferKind::Text],
    }
  }

  fn declares(&self, kind: TransferKind) -> bool {
    self.kinds.contains(&kind)
  }
}

// Wire structs, one per structured kind. Unknown fields are ignored by
// default; a missing required field fails that kind's parse and resolution
// falls through to the next candidate.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeWire {
  source: String,
  change_id: ChangeId,
  commit_id: CommitId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileChangeWire {
  source: String,
  file_change: FileChange,
  from_change_id: ChangeId,
  from_commit_id: CommitId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkWire {
  source: String,
  bookmark_name: BookmarkName,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HunkWire {
  source: String,
  file_path: String,
  start_line: usize,
  end_line: usize,
  from_commit_id: CommitId,
}

fn parse_change(text: &str) -> Option<DragPayload> {
  let wire: ChangeWire = serde_json::from_str(text).ok()?;
  if wire.source != "change" || wire.change_id.as_str().is_empty() || wire.commit_id.as_str().is_empty() {
    return None;
  }
  Some(DragPayload::Change {
    change_id: wire.change_id,
    commit_id: wire.commit_id,
  })
}

fn parse_file_change(text: &str) -> Option<DragPayload> {
  let wire: FileChangeWire = serde_json::from_str(text).ok()?;
  if wire.source != "file-change" || wire.file_change.path.is_empty() || wire.from_commit_id.as_str().is_empty() {
    return None;
  }
  Some(DragPayload::FileChange {
    file_change: wire.file_change,
    from_change_id: wire.from_change_id,
    from_commit_id: wire.from_commit_id,
  })
}

fn parse_bookmark(text: &str) -> Option<DragPayload> {
  let wire: BookmarkWire = serde_json::from_str(text).ok()?;
  if wire.source != "bookmark" || wire.bookmark_name.as_str().is_empty() {
    return None;
  }
  Some(DragPayload::Bookmark {
    bookmark_name: wire.bookmark_name,
  })
}

fn parse_hunk(text: &str) -> Option<DragPayload> {
  let wire: HunkWire = serde_json::from_str(text).ok()?;
  if wire.source != "hunk"
    || wire.file_path.is_empty()
    || wire.start_line < 1
    || wire.end_line < wire.start_line
    || wire.from_commit_id.as_str().is_empty()
  {
    return None;
  }
  Some(DragPayload::Hunk {
    file_path: wire.file_path,
    start_line: wire.start_line,
    end_line: wire.end_line,
    from_commit_id: wire.from_commit_id,
  })
}

/// Resolve transfer data into exactly one payload.
///
/// Resolution order: the session side-channel recorded at drag start is
/// authoritative; failing that, the structured parser chain runs in priority
/// order (change, file-change, bookmark, hunk); failing that, the transfer's
/// declared content kinds classify it as external; anything else is
/// unresolved.
pub fn resolve_payload(session: &DragSession, transfer: &TransferData) -> DragPayload {
  if let Some(payload) = session.active() {
    trace!("drag payload resolved from session");
    return payload.clone();
  }

  if let Some(text) = transfer.text.as_deref() {
    let parsers: [fn(&str) -> Option<DragPayload>; 4] = [parse_change, parse_file_change, parse_bookmark, parse_hunk];
    for parser in parsers {
      if let Some(payload) = parser(text) {
        return payload;
      }
    }
  }

  if transfer.declares(TransferKind::File) {
    return DragPayload::ExternalFile;
  }
  if transfer.declares(TransferKind::Text) {
    return DragPayload::ExternalText;
  }

  DragPayload::Unresolved
}
