//! Headless replay of scripted board events.
//!
//! A script is a JSON array of steps. Pieces are referred to by the order they
//! were spawned in (`0` is the first successful spawn), so scripts never need
//! to know the generated ids. Board-level refusals (quota hits, unknown cells,
//! calls before initialization) are recorded in the step's outcome and the
//! replay carries on; only a malformed script, a spawn with half a position,
//! or a dangling piece reference stops it.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::diagnostics::BoardDiagnostics;
use crate::engine::{Action, BoardCore, BoardError};
use crate::input::{Button, PointerEvent};
use crate::piece::{PieceId, PieceKind};
use crate::viewport::{LocalPoint, ScreenPoint};

fn primary() -> Button {
    Button::Primary
}

/// One scripted host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Init { width: f64, height: f64 },
    Resize { width: f64, height: f64 },
    Spawn { kind: PieceKind, x: Option<f64>, y: Option<f64> },
    SpawnAtCell { kind: PieceKind, row: u32, col: u32 },
    /// Press at a screen point. Without `piece`, the topmost piece under the
    /// pointer is used; a press on empty canvas does nothing.
    PointerDown {
        piece: Option<usize>,
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: Button,
    },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerLeave { x: f64, y: f64 },
    Rotate { piece: usize },
    Delete { piece: usize },
    DeleteAll,
    Reset,
    Dispose,
    Diagnostics,
}

impl Step {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Resize { .. } => "resize",
            Self::Spawn { .. } => "spawn",
            Self::SpawnAtCell { .. } => "spawn_at_cell",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerLeave { .. } => "pointer_leave",
            Self::Rotate { .. } => "rotate",
            Self::Delete { .. } => "delete",
            Self::DeleteAll => "delete_all",
            Self::Reset => "reset",
            Self::Dispose => "dispose",
            Self::Diagnostics => "diagnostics",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step {step}: no piece #{piece} has been spawned")]
    UnknownPieceRef { step: usize, piece: usize },
    #[error("step {step}: spawn position needs both x and y")]
    PartialPosition { step: usize },
}

/// A refused board operation, as recorded in a step outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub code: &'static str,
    pub message: String,
}

impl From<&BoardError> for StepFailure {
    fn from(err: &BoardError) -> Self {
        Self { code: err.code(), message: err.to_string() }
    }
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawned: Option<PieceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<BoardDiagnostics>,
}

impl StepOutcome {
    fn new(index: usize, step: &Step) -> Self {
        Self { index, op: step.name(), actions: Vec::new(), spawned: None, failure: None, diagnostics: None }
    }
}

/// Parse a JSON script.
pub fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(source)?)
}

/// Replays steps against a board, remembering spawned ids in order.
#[derive(Debug)]
pub struct Runner {
    board: BoardCore,
    spawned: Vec<PieceId>,
}

impl Runner {
    #[must_use]
    pub fn new(board: BoardCore) -> Self {
        Self { board, spawned: Vec::new() }
    }

    #[must_use]
    pub fn board(&self) -> &BoardCore {
        &self.board
    }

    /// Ids of every piece spawned so far, in spawn order.
    #[must_use]
    pub fn spawned(&self) -> &[PieceId] {
        &self.spawned
    }

    /// Run every step, stopping at the first script error.
    pub fn run(&mut self, steps: &[Step]) -> Result<Vec<StepOutcome>, ScriptError> {
        steps.iter().enumerate().map(|(index, step)| self.apply(index, step)).collect()
    }

    /// Run a single step.
    pub fn apply(&mut self, index: usize, step: &Step) -> Result<StepOutcome, ScriptError> {
        debug!(index, op = step.name(), "replaying step");
        let mut outcome = StepOutcome::new(index, step);
        let result: Result<Vec<Action>, BoardError> = match step {
            Step::Init { width, height } => self.board.initialize_board(*width, *height),
            Step::Resize { width, height } => Ok(self.board.on_viewport_resize(*width, *height)),
            Step::Spawn { kind, x, y } => {
                let at = match (x, y) {
                    (Some(x), Some(y)) => Some(LocalPoint::new(*x, *y)),
                    (None, None) => None,
                    _ => return Err(ScriptError::PartialPosition { step: index }),
                };
                let result = self.board.spawn_piece(*kind, at);
                self.record_spawn(result, &mut outcome)
            }
            Step::SpawnAtCell { kind, row, col } => {
                let result = self.board.spawn_piece_at_cell(*kind, *row, *col);
                self.record_spawn(result, &mut outcome)
            }
            Step::PointerDown { piece, x, y, button } => {
                let target = match piece {
                    Some(piece) => Some(self.resolve(index, *piece)?),
                    None => self.board.hit_test(ScreenPoint::new(*x, *y)),
                };
                match target {
                    Some(id) => self.board.on_pointer_down(id, PointerEvent::new(*x, *y, *button)),
                    None => Ok(Vec::new()),
                }
            }
            Step::PointerMove { x, y } => Ok(self.board.on_pointer_move(PointerEvent::primary(*x, *y))),
            Step::PointerUp { x, y } => Ok(self.board.on_pointer_up(PointerEvent::primary(*x, *y))),
            Step::PointerLeave { x, y } => Ok(self.board.on_pointer_leave(PointerEvent::primary(*x, *y))),
            Step::Rotate { piece } => {
                let id = self.resolve(index, *piece)?;
                self.board.rotate_piece(id)
            }
            Step::Delete { piece } => {
                let id = self.resolve(index, *piece)?;
                self.board.delete_piece(id)
            }
            Step::DeleteAll => Ok(self.board.delete_all_pieces()),
            Step::Reset => Ok(self.board.reset()),
            Step::Dispose => Ok(self.board.dispose()),
            Step::Diagnostics => {
                outcome.diagnostics = self.board.diagnostics();
                Ok(Vec::new())
            }
        };

        match result {
            Ok(actions) => outcome.actions = actions,
            Err(err) => {
                warn!(index, op = step.name(), code = err.code(), error = %err, "step refused");
                outcome.failure = Some(StepFailure::from(&err));
            }
        }
        Ok(outcome)
    }

    fn record_spawn(
        &mut self,
        result: Result<PieceId, BoardError>,
        outcome: &mut StepOutcome,
    ) -> Result<Vec<Action>, BoardError> {
        let id = result?;
        self.spawned.push(id);
        outcome.spawned = Some(id);
        Ok(vec![Action::RenderNeeded])
    }

    fn resolve(&self, step: usize, piece: usize) -> Result<PieceId, ScriptError> {
        self.spawned.get(piece).copied().ok_or(ScriptError::UnknownPieceRef { step, piece })
    }
}
