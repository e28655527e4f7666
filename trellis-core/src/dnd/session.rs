//! Per-gesture drag session.
//!
//! The payload recorded at drag start is the authoritative answer during the
//! rest of the gesture: transfer data seen mid-flight can be unreliable
//! across event phases, so resolution consults the session first. Exactly one
//! payload is active at a time, and the session is cleared deterministically
//! on drop, cancel, or the start of the next gesture — it is owned state
//! threaded through the handlers, never a global.

use tracing::trace;

use crate::dnd::payload::DragPayload;

/// Owner of the single active drag gesture.
#[derive(Debug, Default)]
pub struct DragSession {
  active: Option<DragPayload>,
}

impl DragSession {
  /// A session with no active gesture.
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the payload of a newly started gesture.
  ///
  /// Any payload left over from an interrupted gesture is discarded: the new
  /// drag is the only owner.
  pub fn start(&mut self, payload: DragPayload) {
    if self.active.is_some() {
      trace!("stale drag payload replaced by new gesture");
    }
    self.active = Some(payload);
  }

  /// The active payload, if a gesture is in flight.
  pub fn active(&self) -> Option<&DragPayload> {
    self.active.as_ref()
  }

  /// Returns `true` while a gesture is in flight.
  pub fn is_active(&self) -> bool {
    self.active.is_some()
  }

  /// Consume the gesture on a validated drop, yielding its payload.
  pub fn complete(&mut self) -> Option<DragPayload> {
    self.active.take()
  }

  /// Abandon the gesture with no side effect.
  pub fn cancel(&mut self) {
    self.active = None;
  }
}
