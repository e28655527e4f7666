//! Hunk addressing: header parsing and line-range specs.
//!
//! A hunk is a contiguous line range within a file's change, addressable
//! independently of the whole file. Two textual forms feed into a
//! [`LineRange`]: the unified-diff hunk header emitted by the diff layer,
//! and the `path:start-end` spec accepted on the command line.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive, 1-indexed line range in the new side of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
  pub start: usize,
  pub end: usize,
}

impl LineRange {
  /// Construct a range; `start` and `end` are 1-indexed and inclusive.
  /// Returns `None` for `start == 0` or an inverted range.
  pub fn new(start: usize, end: usize) -> Option<Self> {
    if start < 1 || end < start {
      return None;
    }
    Some(Self { start, end })
  }

  /// Number of lines covered.
  pub fn len(&self) -> usize {
    self.end - self.start + 1
  }

  /// A constructed range always covers at least one line.
  pub fn is_empty(&self) -> bool {
    false
  }

  /// Returns `true` when the 1-indexed line falls inside the range.
  pub fn contains(&self, line: usize) -> bool {
    self.start <= line && line <= self.end
  }
}

/// Errors produced when parsing a `path:start-end` range spec.
#[derive(Debug, Error)]
pub enum RangeSpecError {
  #[error("invalid range spec: expected path:start-end, got '{0}'")]
  MissingSeparator(String),
  #[error("invalid line range in '{0}': expected start-end")]
  MalformedRange(String),
  #[error("line numbers must be >= 1 in '{0}'")]
  ZeroLine(String),
  #[error("start line must be <= end line in '{0}'")]
  Inverted(String),
}

static HUNK_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^@@ -\d+(?:,\d+)? \+(\d+)(?:,(\d+))? @@").expect("Failed to compile hunk header regex")
});

/// Parse a unified-diff hunk header into the new-file line range it covers.
///
/// The only supported form is `@@ -oldStart[,oldCount] +newStart[,newCount] @@`
/// (trailing context after the closing `@@` is ignored). `newCount` defaults
/// to 1; a count of zero describes a pure deletion with no new-file line to
/// address, which yields no range — the caller disables hunk-level dragging
/// for that hunk.
pub fn parse_hunk_header(header: &str) -> Option<LineRange> {
  let captures = HUNK_HEADER_PATTERN.captures(header)?;
  let start: usize = captures.get(1)?.as_str().parse().ok()?;
  let count: usize = match captures.get(2) {
    Some(count) => count.as_str().parse().ok()?,
    None => 1,
  };
  if count == 0 {
    return None;
  }
  LineRange::new(start, start + count - 1)
}

/// Parse a `path:start-end` spec into a file path and line range.
///
/// The split on `:` is right-most so paths containing colons survive.
pub fn parse_range_spec(spec: &str) -> Result<(String, LineRange), RangeSpecError> {
  let Some((path, range_part)) = spec.rsplit_once(':') else {
    return Err(RangeSpecError::MissingSeparator(spec.to_string()));
  };
  if path.is_empty() {
    return Err(RangeSpecError::MissingSeparator(spec.to_string()));
  }

  let Some((start_part, end_part)) = range_part.split_once('-') else {
    return Err(RangeSpecError::MalformedRange(spec.to_string()));
  };
  let start: usize = start_part
    .parse()
    .map_err(|_| RangeSpecError::MalformedRange(spec.to_string()))?;
  let end: usize = end_part
    .parse()
    .map_err(|_| RangeSpecError::MalformedRange(spec.to_string()))?;

  if start < 1 || end < 1 {
    return Err(RangeSpecError::ZeroLine(spec.to_string()));
  }
  if start > end {
    return Err(RangeSpecError::Inverted(spec.to_string()));
  }

  // Bounds were checked above, so the constructor cannot refuse.
  let range = LineRange::new(start, end).ok_or_else(|| RangeSpecError::Inverted(spec.to_string()))?;
  Ok((path.to_string(), range))
}
