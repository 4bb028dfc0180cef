//! Input model: pointer events and the drag state machine.
//!
//! `DragController` tracks the single active drag between pointer-down and
//! pointer-up. A session owns the pointer listeners it needs on the drag
//! surface (move, up, leave); they are handed back only through
//! [`DragController::finish`], which is the one teardown path for every way a
//! drag can end. The board engine turns the returned listener lists into
//! attach/detach actions for the host.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::piece::PieceId;
use crate::viewport::{LocalPoint, ScreenPoint};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Pointer position relative to the canvas, in screen pixels.
    pub screen: ScreenPoint,
    pub button: Button,
}

impl PointerEvent {
    #[must_use]
    pub fn new(x: f64, y: f64, button: Button) -> Self {
        Self { screen: ScreenPoint::new(x, y), button }
    }

    #[must_use]
    pub fn primary(x: f64, y: f64) -> Self {
        Self::new(x, y, Button::Primary)
    }

    #[must_use]
    pub fn secondary(x: f64, y: f64) -> Self {
        Self::new(x, y, Button::Secondary)
    }
}

/// A pointer listener on the drag surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listener {
    Move,
    Up,
    Leave,
}

/// Listeners every drag session subscribes to.
pub const SESSION_LISTENERS: [Listener; 3] = [Listener::Move, Listener::Up, Listener::Leave];

/// Why a drag session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragEnd {
    /// Pointer released over the drag surface.
    PointerUp,
    /// Pointer left the drag surface.
    PointerLeave,
    /// Torn down by the board (piece deleted, board reset or disposed).
    Cancelled,
}

impl DragEnd {
    /// Whether the end of the drag should run the snap resolver.
    #[must_use]
    pub fn snaps(self) -> bool {
        matches!(self, Self::PointerUp | Self::PointerLeave)
    }
}

/// The active drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragSession {
    /// Id of the piece being dragged.
    pub piece_id: PieceId,
    /// Offset from the pointer to the piece centre. Zero because a grab
    /// re-centres the piece under the pointer.
    pub grab_offset: LocalPoint,
}

impl DragSession {
    /// Where the piece centre belongs for a pointer at `pointer` (local space).
    #[must_use]
    pub fn target(&self, pointer: LocalPoint) -> LocalPoint {
        pointer - self.grab_offset
    }
}

/// A drag that has just been torn down.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedDrag {
    pub session: DragSession,
    pub end: DragEnd,
    /// Listeners released by the teardown; the host must detach them.
    pub released: Vec<Listener>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DragError {
    #[error("a drag is already active for piece {piece_id}")]
    SessionActive { piece_id: PieceId },
}

/// Internal state for the drag state machine.
#[derive(Debug, Clone, Default)]
pub enum DragState {
    /// No drag in progress; waiting for the next primary press on a piece.
    #[default]
    Idle,
    /// A piece is following the pointer.
    Dragging {
        session: DragSession,
        /// Listeners held for the session.
        listeners: Vec<Listener>,
    },
}

/// Single-pointer drag controller.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag on `piece_id`, acquiring the session listeners.
    ///
    /// Refused while another session is active.
    pub fn begin(&mut self, piece_id: PieceId) -> Result<DragSession, DragError> {
        if let DragState::Dragging { session, .. } = &self.state {
            return Err(DragError::SessionActive { piece_id: session.piece_id });
        }
        let session = DragSession { piece_id, grab_offset: LocalPoint::default() };
        self.state = DragState::Dragging { session, listeners: SESSION_LISTENERS.to_vec() };
        debug!(%piece_id, "drag session started");
        Ok(session)
    }

    /// Tear down the active session, releasing its listeners.
    ///
    /// Returns `None` when idle.
    pub fn finish(&mut self, end: DragEnd) -> Option<FinishedDrag> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Dragging { session, listeners } => {
                debug!(piece_id = %session.piece_id, ?end, "drag session ended");
                Some(FinishedDrag { session, end, released: listeners })
            }
        }
    }

    /// The active session, if any.
    #[must_use]
    pub fn active(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { session, .. } => Some(session),
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Listeners currently held; empty when idle.
    #[must_use]
    pub fn listeners(&self) -> &[Listener] {
        match &self.state {
            DragState::Idle => &[],
            DragState::Dragging { listeners, .. } => listeners,
        }
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }
}
