//! Drag-and-drop resolution.
//!
//! The interaction pipeline runs in two pure steps: transfer data captured at
//! a drag event resolves into exactly one [`payload::DragPayload`], and a
//! payload released onto a [`target::DropZonePosition`] resolves into either
//! a canonical command or an ignore. Nothing in this module mutates the
//! repository; execution belongs to the dispatcher.

pub mod payload;
pub mod session;
pub mod target;

pub use payload::{DragPayload, FileChange, FileStatus, TransferData, TransferKind, resolve_payload};
pub use session::DragSession;
pub use target::{CommandTarget, DomainCommand, DropZonePosition, MoveDestination, Resolution, resolve_drop};
