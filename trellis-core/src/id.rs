//! Identifier newtypes shared across the stack graph and command resolution.
//!
//! All of these wrap plain strings supplied by the backing version-control
//! engine, but they carry distinct semantic roles and must never be mixed: a
//! [`CommitId`] changes every time a commit is amended, while the commit's
//! [`ChangeId`] stays stable across amendments. Keeping them as separate
//! types makes a mix-up a compile error instead of a data corruption.

use std::fmt;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

macro_rules! string_id {
  ($(#[$doc:meta])* $name:ident) => {
    $(#[$doc])*
    #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
    pub struct $name(Arc<str>);

    impl $name {
      /// Construct an identifier from any string-like value.
      pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
      }

      /// Borrow the underlying identifier as a `&str`.
      pub fn as_str(&self) -> &str {
        &self.0
      }
    }

    impl fmt::Debug for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(stringify!($name)).field(&self.as_str()).finish()
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl From<&str> for $name {
      fn from(value: &str) -> Self {
        Self::new(Arc::<str>::from(value))
      }
    }

    impl From<String> for $name {
      fn from(value: String) -> Self {
        Self::new(Arc::<str>::from(value))
      }
    }

    impl Serialize for $name {
      fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
      }
    }

    impl<'de> Deserialize<'de> for $name {
      fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value))
      }
    }
  };
}

string_id! {
  /// Identifier of a concrete commit object. Every amendment produces a new
  /// one.
  CommitId
}

string_id! {
  /// Stable logical identity of a change, preserved across amendments of the
  /// commit that carries it.
  ChangeId
}

string_id! {
  /// Name of a bookmark (a movable named pointer at a commit).
  BookmarkName
}

/// Identifier of a stack within a stack graph.
///
/// Assigned densely by the stack builder in discovery order, so it is only
/// meaningful relative to the graph that produced it.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StackId(u32);

impl StackId {
  pub(crate) fn new(index: u32) -> Self {
    Self(index)
  }

  /// The dense index backing this id.
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

impl fmt::Debug for StackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "StackId({})", self.0)
  }
}

impl fmt::Display for StackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "s{}", self.0)
  }
}

impl Serialize for StackId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u32(self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identifier_types_are_distinct() {
    let commit = CommitId::from("abc123");
    let change = ChangeId::from("abc123");

    // Same text, different types; equality is only defined within a type.
    assert_eq!(commit.as_str(), change.as_str());
    assert_eq!(commit, CommitId::from("abc123"));
  }

  #[test]
  fn identifiers_round_trip_through_json() {
    let commit = CommitId::from("deadbeef");
    let json = serde_json::to_string(&commit).unwrap();
    assert_eq!(json, "\"deadbeef\"");

    let back: CommitId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, commit);
  }

  #[test]
  fn stack_id_displays_with_prefix() {
    assert_eq!(StackId::new(3).to_string(), "s3");
    assert_eq!(StackId::new(3).index(), 3);
  }
}
