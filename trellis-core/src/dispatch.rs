//! Command dispatch seam and the single-flight gate.
//!
//! The core resolves drops into commands; executing them against the backing
//! engine is the dispatcher's job, behind a trait so the view layer and the
//! tests can substitute their own. At most one command may execute at a
//! time: the gate is a cooperative single-slot lock whose permit releases on
//! drop, so every exit path — success, failure, panic unwind — frees the
//! slot.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::debug;

use crate::dnd::target::DomainCommand;
use crate::id::CommitId;

/// Errors surfaced by guarded dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
  /// Another command currently holds the gate.
  #[error("another command is already executing")]
  Busy,
  /// The dispatcher reported a failure executing the command.
  #[error(transparent)]
  Failed(#[from] anyhow::Error),
}

/// Executes resolved commands against the backing version-control engine.
pub trait CommandDispatcher {
  fn dispatch(&self, command: &DomainCommand) -> anyhow::Result<()>;
}

/// Cooperative at-most-one-command-in-flight lock.
///
/// Not an OS-level lock: a single flag, checked by the affordances that
/// would create a command and held for the duration of a dispatch.
#[derive(Debug, Default)]
pub struct CommandGate {
  executing: AtomicBool,
}

impl CommandGate {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns `true` while a command is executing. Affordances that would
  /// create a new command must be disabled while this holds.
  pub fn is_executing(&self) -> bool {
    self.executing.load(Ordering::Acquire)
  }

  /// Try to take the single slot. `None` means a command is already in
  /// flight.
  pub fn try_acquire(&self) -> Option<CommandPermit<'_>> {
    let acquired = self
      .executing
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok();
    acquired.then_some(CommandPermit { gate: self })
  }
}

/// Held while a command executes; releases the gate on drop.
#[derive(Debug)]
pub struct CommandPermit<'a> {
  gate: &'a CommandGate,
}

impl Drop for CommandPermit<'_> {
  fn drop(&mut self) {
    self.gate.executing.store(false, Ordering::Release);
  }
}

/// Dispatch a command through the gate.
///
/// Fails fast with [`DispatchError::Busy`] when another command holds the
/// slot; otherwise the permit is held across the dispatcher call and
/// released whatever the outcome.
pub fn dispatch_guarded(
  gate: &CommandGate,
  dispatcher: &dyn CommandDispatcher,
  command: &DomainCommand,
) -> Result<(), DispatchError> {
  let _permit = gate.try_acquire().ok_or(DispatchError::Busy)?;
  debug!(?command, "dispatching command");
  dispatcher.dispatch(command)?;
  Ok(())
}

/// The direct "create empty change here" trigger.
///
/// Not drag resolution: this fires from a zero-payload affordance on a
/// new-branch zone, and respects the same gate as every other command.
pub fn create_empty_change(
  gate: &CommandGate,
  dispatcher: &dyn CommandDispatcher,
  from: CommitId,
) -> Result<(), DispatchError> {
  dispatch_guarded(gate, dispatcher, &DomainCommand::CreateEmpty { from })
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use anyhow::bail;

  use super::*;

  #[derive(Default)]
  struct RecordingDispatcher {
    commands: Mutex<Vec<DomainCommand>>,
    fail: bool,
  }

  impl CommandDispatcher for RecordingDispatcher {
    fn dispatch(&self, command: &DomainCommand) -> anyhow::Result<()> {
      self.commands.lock().unwrap().push(command.clone());
      if self.fail {
        bail!("dispatch failed");
      }
      Ok(())
    }
  }

  fn create_empty(from: &str) -> DomainCommand {
    DomainCommand::CreateEmpty {
      from: CommitId::from(from),
    }
  }

  #[test]
  fn dispatch_runs_and_releases_the_gate() {
    let gate = CommandGate::new();
    let dispatcher = RecordingDispatcher::default();

    dispatch_guarded(&gate, &dispatcher, &create_empty("a")).unwrap();

    assert_eq!(dispatcher.commands.lock().unwrap().len(), 1);
    assert!(!gate.is_executing());
  }

  #[test]
  fn gate_rejects_a_second_command_in_flight() {
    let gate = CommandGate::new();
    let _permit = gate.try_acquire().unwrap();
    assert!(gate.is_executing());

    let dispatcher = RecordingDispatcher::default();
    let result = create_empty_change(&gate, &dispatcher, CommitId::from("a"));
    assert!(matches!(result, Err(DispatchError::Busy)));
    assert!(dispatcher.commands.lock().unwrap().is_empty());
  }

  #[test]
  fn gate_releases_after_dispatch_failure() {
    let gate = CommandGate::new();
    let dispatcher = RecordingDispatcher {
      fail: true,
      ..RecordingDispatcher::default()
    };

    let result = dispatch_guarded(&gate, &dispatcher, &create_empty("a"));
    assert!(matches!(result, Err(DispatchError::Failed(_))));
    assert!(!gate.is_executing(), "gate must release on failure");
  }

  #[test]
  fn permit_drop_reopens_the_gate() {
    let gate = CommandGate::new();
    {
      let _permit = gate.try_acquire().unwrap();
      assert!(gate.try_acquire().is_none());
    }
    assert!(gate.try_acquire().is_some());
  }
}
