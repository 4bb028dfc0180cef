//! Board engine: lifecycle plus the in-process API the host calls into.
//!
//! `BoardCore` wires the scale tracker, grid layout, spawn ledger, piece store
//! and drag controller together. Every handler runs to completion and returns
//! the [`Action`]s the host must apply to its rendering surface; precondition
//! failures are logged and surface as typed [`BoardError`]s or empty action
//! lists, never as panics.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::BoardConfig;
use crate::diagnostics::BoardDiagnostics;
use crate::grid::{self, GridLayout};
use crate::input::{Button, DragController, DragEnd, DragError, DragSession, Listener, PointerEvent};
use crate::ledger::{SpawnLedger, SpawnRejection};
use crate::piece::{Piece, PieceId, PieceKind, PieceStore, PieceVisual};
use crate::snap;
use crate::viewport::{LocalPoint, ScaleState, ScaleTracker, ScreenPoint, ViewportError};

/// Actions returned from board handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Apply this scale to the stage transform and refresh the hit region.
    SetStageScale { scale_x: f64, scale_y: f64 },
    PieceMoved { id: PieceId, position: LocalPoint },
    PieceRotated { id: PieceId, rotation: f64 },
    PieceVisualChanged { id: PieceId, visual: PieceVisual },
    PieceSnapped { id: PieceId, anchor_id: String, position: LocalPoint },
    PieceRemoved { id: PieceId },
    /// A drag session finished; `anchor_id` is the cell the piece snapped to.
    DragEnded { id: PieceId, end: DragEnd, position: LocalPoint, anchor_id: Option<String> },
    AttachListeners { listeners: Vec<Listener> },
    DetachListeners { listeners: Vec<Listener> },
    RenderNeeded,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("board not initialized")]
    NotInitialized,
    #[error("board already initialized")]
    AlreadyInitialized,
    #[error("board disposed")]
    Disposed,
    #[error("viewport error: {0}")]
    Viewport(#[from] ViewportError),
    #[error("spawn rejected: {0}")]
    Rejected(#[from] SpawnRejection),
    #[error("no anchor cell at row {row}, col {col}")]
    UnknownCell { row: u32, col: u32 },
    #[error("piece not found: {0}")]
    UnknownPiece(PieceId),
    #[error("invalid position ({x}, {y})")]
    InvalidPosition { x: f64, y: f64 },
    #[error("drag error: {0}")]
    Drag(#[from] DragError),
}

impl BoardError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "E_NOT_INITIALIZED",
            Self::AlreadyInitialized => "E_ALREADY_INITIALIZED",
            Self::Disposed => "E_DISPOSED",
            Self::Viewport(_) => "E_VIEWPORT",
            Self::Rejected(rejection) => rejection.code(),
            Self::UnknownCell { .. } => "E_UNKNOWN_CELL",
            Self::UnknownPiece(_) => "E_UNKNOWN_PIECE",
            Self::InvalidPosition { .. } => "E_INVALID_POSITION",
            Self::Drag(_) => "E_DRAG_ACTIVE",
        }
    }
}

/// Where the board is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Created but no canvas size captured yet.
    #[default]
    Uninitialized,
    /// Grid laid out; accepting input.
    Ready,
    /// Torn down; every operation is refused.
    Disposed,
}

/// Core board state. Owns everything; the host holds it by `&mut`.
#[derive(Debug, Default)]
pub struct BoardCore {
    config: BoardConfig,
    lifecycle: Lifecycle,
    viewport: ScaleTracker,
    grid: GridLayout,
    ledger: SpawnLedger,
    pieces: PieceStore,
    drag: DragController,
}

impl BoardCore {
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::Uninitialized,
            viewport: ScaleTracker::new(),
            grid: GridLayout { spec: config.grid, ..GridLayout::default() },
            ledger: SpawnLedger::new(config.quotas),
            pieces: PieceStore::new(),
            drag: DragController::new(),
        }
    }

    // --- Lifecycle ---

    /// Capture the logical canvas size and lay out the anchor grid. Runs once.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` on a second call, `Disposed` after
    /// [`BoardCore::dispose`], and `Viewport` for a non-finite or negative size.
    pub fn initialize_board(&mut self, width: f64, height: f64) -> Result<Vec<Action>, BoardError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Ready => {
                warn!(width, height, "board already initialized; ignoring");
                return Err(BoardError::AlreadyInitialized);
            }
            Lifecycle::Disposed => {
                warn!("initialize called on disposed board");
                return Err(BoardError::Disposed);
            }
        }

        let state = self.viewport.initialize(width, height)?;
        self.grid = grid::layout(width, height, self.config.grid);
        self.lifecycle = Lifecycle::Ready;
        info!(width, height, cells = self.grid.cells.len(), "board initialized");
        Ok(vec![Action::SetStageScale { scale_x: state.scale_x, scale_y: state.scale_y }, Action::RenderNeeded])
    }

    /// Remove every piece but keep the grid and scale.
    pub fn reset(&mut self) -> Vec<Action> {
        let actions = self.delete_all_pieces();
        self.pieces = PieceStore::new();
        actions
    }

    /// Tear the board down. Any active drag is cancelled without snapping.
    pub fn dispose(&mut self) -> Vec<Action> {
        if self.lifecycle == Lifecycle::Disposed {
            return Vec::new();
        }
        let actions = self.clear_pieces();
        self.grid = GridLayout { spec: self.config.grid, ..GridLayout::default() };
        self.lifecycle = Lifecycle::Disposed;
        info!("board disposed");
        actions
    }

    fn ensure_ready(&self) -> Result<(), BoardError> {
        match self.lifecycle {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Uninitialized => {
                warn!("board used before initialization");
                Err(BoardError::NotInitialized)
            }
            Lifecycle::Disposed => {
                warn!("board used after dispose");
                Err(BoardError::Disposed)
            }
        }
    }

    // --- Viewport ---

    /// Host viewport changed size. Only the stage transform changes.
    pub fn on_viewport_resize(&mut self, width: f64, height: f64) -> Vec<Action> {
        if self.ensure_ready().is_err() {
            return Vec::new();
        }
        match self.viewport.on_resize(width, height) {
            Ok(state) => vec![
                Action::SetStageScale { scale_x: state.scale_x, scale_y: state.scale_y },
                Action::RenderNeeded,
            ],
            Err(e) => {
                warn!(error = %e, "resize ignored");
                Vec::new()
            }
        }
    }

    // --- Spawning ---

    /// Spawn a piece of `kind` centred at `at`, or at the canvas centre.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when a quota is exhausted and `InvalidPosition` for
    /// non-finite coordinates.
    pub fn spawn_piece(&mut self, kind: PieceKind, at: Option<LocalPoint>) -> Result<PieceId, BoardError> {
        self.ensure_ready()?;
        let position = match at {
            Some(point) => point,
            None => self.logical_center(),
        };
        if !position.x.is_finite() || !position.y.is_finite() {
            warn!(x = position.x, y = position.y, "refusing to spawn at non-finite position");
            return Err(BoardError::InvalidPosition { x: position.x, y: position.y });
        }

        let id = self.ledger.try_reserve(kind)?;
        let seq = self.pieces.next_seq();
        self.pieces.insert(Piece::new(id, kind, position, self.grid.spawn_side, seq));
        info!(%kind, %id, x = position.x, y = position.y, total = self.ledger.total(), "piece spawned");
        Ok(id)
    }

    /// Spawn a piece of `kind` centred on the anchor cell at `(row, col)`.
    pub fn spawn_piece_at_cell(&mut self, kind: PieceKind, row: u32, col: u32) -> Result<PieceId, BoardError> {
        self.ensure_ready()?;
        let Some(center) = self.grid.cell_center(row, col) else {
            warn!(row, col, "spawn requested outside the grid");
            return Err(BoardError::UnknownCell { row, col });
        };
        self.spawn_piece(kind, Some(center))
    }

    fn logical_center(&self) -> LocalPoint {
        match self.viewport.state() {
            Some(state) => LocalPoint::new(state.initial_width / 2.0, state.initial_height / 2.0),
            None => LocalPoint::default(),
        }
    }

    // --- Pointer input ---

    /// Pointer pressed on `piece_id`: primary drags, secondary rotates.
    pub fn on_pointer_down(&mut self, piece_id: PieceId, event: PointerEvent) -> Result<Vec<Action>, BoardError> {
        match event.button {
            Button::Primary => self.begin_drag(piece_id, event),
            Button::Secondary => self.rotate_piece(piece_id),
            Button::Middle => Ok(Vec::new()),
        }
    }

    /// Start dragging `piece_id`. The piece centre jumps to the pointer.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPiece` if the piece doesn't exist and `Drag` while
    /// another session is active.
    pub fn begin_drag(&mut self, piece_id: PieceId, event: PointerEvent) -> Result<Vec<Action>, BoardError> {
        self.ensure_ready()?;
        if self.pieces.get(&piece_id).is_none() {
            return Err(BoardError::UnknownPiece(piece_id));
        }
        let session = self.drag.begin(piece_id).inspect_err(|e| warn!(error = %e, "drag refused"))?;

        let target = session.target(self.viewport.screen_to_local(event.screen));
        let mut actions = Vec::with_capacity(4);
        if let Some(piece) = self.pieces.get_mut(&piece_id) {
            piece.visual = PieceVisual::dragging();
            piece.position = target;
            actions.push(Action::PieceVisualChanged { id: piece_id, visual: piece.visual });
            actions.push(Action::PieceMoved { id: piece_id, position: target });
        }
        actions.push(Action::AttachListeners { listeners: self.drag.listeners().to_vec() });
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Pointer moved over the drag surface. Ignored unless dragging.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        let Some(session) = self.drag.active().copied() else {
            return Vec::new();
        };
        let target = session.target(self.viewport.screen_to_local(event.screen));
        let Some(piece) = self.pieces.get_mut(&session.piece_id) else {
            warn!(piece_id = %session.piece_id, "dragged piece vanished; cancelling drag");
            return self.end_drag(DragEnd::Cancelled);
        };
        piece.position = target;
        vec![Action::PieceMoved { id: session.piece_id, position: target }, Action::RenderNeeded]
    }

    /// Pointer released. Ends the drag and snaps.
    pub fn on_pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        debug!(x = event.screen.x, y = event.screen.y, "pointer up");
        self.end_drag(DragEnd::PointerUp)
    }

    /// Pointer left the drag surface. Ends the drag and snaps.
    pub fn on_pointer_leave(&mut self, event: PointerEvent) -> Vec<Action> {
        debug!(x = event.screen.x, y = event.screen.y, "pointer left drag surface");
        self.end_drag(DragEnd::PointerLeave)
    }

    /// The single teardown path for a drag session.
    ///
    /// Restores the piece's resting visual, runs the snap resolver once when
    /// `end` calls for it, and releases the session listeners. A no-op when
    /// idle.
    pub fn end_drag(&mut self, end: DragEnd) -> Vec<Action> {
        let Some(finished) = self.drag.finish(end) else {
            return Vec::new();
        };
        let id = finished.session.piece_id;
        let mut actions = Vec::with_capacity(5);

        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.visual = PieceVisual::rest();
            actions.push(Action::PieceVisualChanged { id, visual: piece.visual });

            let mut anchor_id = None;
            if end.snaps() {
                if let Some(cell) = snap::resolve(&piece.bounds(), &self.grid.cells, self.config.snap_policy) {
                    piece.position = cell.center();
                    info!(%id, anchor = %cell.id, "piece snapped");
                    actions.push(Action::PieceSnapped {
                        id,
                        anchor_id: cell.id.clone(),
                        position: piece.position,
                    });
                    anchor_id = Some(cell.id.clone());
                }
            }
            actions.push(Action::DragEnded { id, end, position: piece.position, anchor_id });
        }

        actions.push(Action::DetachListeners { listeners: finished.released });
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Piece commands ---

    /// Rotate a piece by one quarter turn. No drag state is touched.
    pub fn rotate_piece(&mut self, piece_id: PieceId) -> Result<Vec<Action>, BoardError> {
        self.ensure_ready()?;
        let Some(piece) = self.pieces.get_mut(&piece_id) else {
            return Err(BoardError::UnknownPiece(piece_id));
        };
        let rotation = piece.rotate_step();
        debug!(%piece_id, rotation, "piece rotated");
        Ok(vec![Action::PieceRotated { id: piece_id, rotation }, Action::RenderNeeded])
    }

    /// Delete one piece, cancelling its drag if it is being dragged.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPiece` if the piece doesn't exist.
    pub fn delete_piece(&mut self, piece_id: PieceId) -> Result<Vec<Action>, BoardError> {
        self.ensure_ready()?;
        if self.pieces.get(&piece_id).is_none() {
            return Err(BoardError::UnknownPiece(piece_id));
        }
        let mut actions = Vec::new();
        if self.drag.active().is_some_and(|s| s.piece_id == piece_id) {
            actions.extend(self.end_drag(DragEnd::Cancelled));
        }
        self.pieces.remove(&piece_id);
        self.ledger.release(&piece_id);
        info!(%piece_id, total = self.ledger.total(), "piece deleted");
        actions.push(Action::PieceRemoved { id: piece_id });
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Delete every piece and zero all spawn counters.
    pub fn delete_all_pieces(&mut self) -> Vec<Action> {
        if self.lifecycle == Lifecycle::Disposed {
            warn!("delete_all called on disposed board");
            return Vec::new();
        }
        self.clear_pieces()
    }

    fn clear_pieces(&mut self) -> Vec<Action> {
        let mut actions = self.end_drag(DragEnd::Cancelled);
        self.ledger.release_all();
        let removed = self.pieces.clear();
        info!(removed = removed.len(), "all pieces deleted");
        actions.extend(removed.into_iter().map(|id| Action::PieceRemoved { id }));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Current scale state, once initialized.
    #[must_use]
    pub fn scale(&self) -> Option<ScaleState> {
        self.viewport.state()
    }

    /// Current viewport size in screen pixels.
    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        self.viewport.current_size()
    }

    #[must_use]
    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    #[must_use]
    pub fn ledger(&self) -> &SpawnLedger {
        &self.ledger
    }

    #[must_use]
    pub fn piece(&self, id: &PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    /// All live pieces in draw order.
    #[must_use]
    pub fn pieces(&self) -> Vec<&Piece> {
        self.pieces.sorted_pieces()
    }

    /// The active drag session, if any.
    #[must_use]
    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.active()
    }

    /// Listeners the host should currently have attached to the drag surface.
    #[must_use]
    pub fn listeners(&self) -> &[Listener] {
        self.drag.listeners()
    }

    /// Read-only snapshot for a diagnostics overlay. `None` before initialization.
    #[must_use]
    pub fn diagnostics(&self) -> Option<BoardDiagnostics> {
        let scale = self.viewport.state()?;
        Some(BoardDiagnostics::capture(scale, self.viewport.current_size(), &self.ledger))
    }

    /// Topmost piece under a screen-space point.
    #[must_use]
    pub fn hit_test(&self, screen: ScreenPoint) -> Option<PieceId> {
        let local = self.viewport.screen_to_local(screen);
        self.pieces.sorted_pieces().into_iter().rev().find(|p| p.bounds().contains(local)).map(|p| p.id)
    }
}
