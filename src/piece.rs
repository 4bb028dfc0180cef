//! Piece model: the closed set of piece kinds, live pieces, and their store.
//!
//! A piece's position is its centre in local space. Pieces are square at spawn
//! (scaled by their kind's size ratio) and rotate in quarter turns, so their
//! bounds are always axis-aligned.

#[cfg(test)]
#[path = "piece_test.rs"]
mod piece_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DRAG_ALPHA, REST_ALPHA, ROTATION_STEP_DEG};
use crate::snap::Bounds;
use crate::viewport::LocalPoint;

/// Size ratio of a square asset.
const SQUARE_RATIO: (f64, f64) = (1.0, 1.0);

/// Unique identifier for a live piece.
pub type PieceId = Uuid;

/// The kind of a piece. Each kind maps to one rendering asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    StraightBrown,
    StraightGreen,
    TurnBrown,
    TurnGreen,
}

impl PieceKind {
    /// Every spawnable kind, in toolbar order.
    pub const ALL: [PieceKind; 4] = [Self::StraightBrown, Self::StraightGreen, Self::TurnBrown, Self::TurnGreen];

    /// Asset key used by the host's texture cache.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::StraightBrown => "straightBrown",
            Self::StraightGreen => "straightGreen",
            Self::TurnBrown => "turnBrown",
            Self::TurnGreen => "turnGreen",
        }
    }

    /// Path of the image asset rendered for this kind.
    #[must_use]
    pub fn asset_path(self) -> &'static str {
        match self {
            Self::StraightBrown => "assets/images/straight-brown.jpg",
            Self::StraightGreen => "assets/images/straight-green.jpg",
            Self::TurnBrown => "assets/images/turn-brown.jpg",
            Self::TurnGreen => "assets/images/turn-green.jpg",
        }
    }

    /// Piece size as a fraction of the grid's spawn side, per axis `(x, y)`.
    ///
    /// Every current asset is square, so every kind fills the spawn side.
    #[must_use]
    pub fn size_ratio(self) -> (f64, f64) {
        match self {
            Self::StraightBrown | Self::StraightGreen | Self::TurnBrown | Self::TurnGreen => SQUARE_RATIO,
        }
    }

    /// Short label for diagnostics: `straightBrown` becomes `S.B`.
    #[must_use]
    pub fn abbreviation(self) -> String {
        let key = self.key();
        let mut initials = Vec::new();
        let mut chars = key.chars();
        if let Some(first) = chars.next() {
            initials.push(first.to_ascii_uppercase());
        }
        initials.extend(chars.filter(char::is_ascii_uppercase));
        let label: String = initials.iter().map(char::to_string).collect::<Vec<_>>().join(".");
        label.chars().take(5).collect()
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PieceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| format!("unknown piece kind: {s}"))
    }
}

/// Cursor affordance shown over a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    #[default]
    Grab,
    Grabbing,
}

/// Presentation hints the host applies to the piece's sprite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceVisual {
    pub alpha: f64,
    pub cursor: Cursor,
}

impl PieceVisual {
    /// Visual state at rest.
    #[must_use]
    pub fn rest() -> Self {
        Self { alpha: REST_ALPHA, cursor: Cursor::Grab }
    }

    /// Visual state while being dragged.
    #[must_use]
    pub fn dragging() -> Self {
        Self { alpha: DRAG_ALPHA, cursor: Cursor::Grabbing }
    }
}

impl Default for PieceVisual {
    fn default() -> Self {
        Self::rest()
    }
}

/// A live piece on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    /// Centre in local space.
    pub position: LocalPoint,
    /// Clockwise rotation in degrees, always a multiple of 90 in `[0, 360)`.
    pub rotation: f64,
    /// Half width at zero rotation.
    pub half_extent_x: f64,
    /// Half height at zero rotation.
    pub half_extent_y: f64,
    pub visual: PieceVisual,
    /// Spawn sequence number; lower values are drawn beneath higher values.
    pub seq: u64,
}

impl Piece {
    /// A resting piece of `kind` sized for a grid whose spawn side is `spawn_side`.
    #[must_use]
    pub fn new(id: PieceId, kind: PieceKind, position: LocalPoint, spawn_side: f64, seq: u64) -> Self {
        let (ratio_x, ratio_y) = kind.size_ratio();
        Self {
            id,
            kind,
            position,
            rotation: 0.0,
            half_extent_x: spawn_side * ratio_x * 0.5,
            half_extent_y: spawn_side * ratio_y * 0.5,
            visual: PieceVisual::rest(),
            seq,
        }
    }

    /// Whether the piece is turned sideways (90 or 270 degrees).
    #[must_use]
    pub fn is_quarter_turned(&self) -> bool {
        let steps = (self.rotation / ROTATION_STEP_DEG).round();
        steps.rem_euclid(2.0) >= 1.0
    }

    /// Axis-aligned bounds in local space, accounting for rotation.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        if self.is_quarter_turned() {
            Bounds::from_center(self.position, self.half_extent_y, self.half_extent_x)
        } else {
            Bounds::from_center(self.position, self.half_extent_x, self.half_extent_y)
        }
    }

    /// Advance rotation by one step, wrapping at a full turn.
    pub fn rotate_step(&mut self) -> f64 {
        self.rotation = (self.rotation + ROTATION_STEP_DEG).rem_euclid(360.0);
        self.rotation
    }
}

/// In-memory store of live pieces.
#[derive(Debug, Default)]
pub struct PieceStore {
    pieces: HashMap<PieceId, Piece>,
    next_seq: u64,
}

impl PieceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next spawn sequence number.
    pub fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Insert or replace a piece.
    pub fn insert(&mut self, piece: Piece) {
        self.pieces.insert(piece.id, piece);
    }

    /// Remove a piece by id, returning it if it was present.
    pub fn remove(&mut self, id: &PieceId) -> Option<Piece> {
        self.pieces.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn get_mut(&mut self, id: &PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id)
    }

    /// Remove every piece, returning their ids in draw order.
    pub fn clear(&mut self) -> Vec<PieceId> {
        let ids = self.sorted_pieces().iter().map(|p| p.id).collect();
        self.pieces.clear();
        ids
    }

    /// All pieces sorted by spawn sequence (draw order).
    #[must_use]
    pub fn sorted_pieces(&self) -> Vec<&Piece> {
        let mut pieces: Vec<&Piece> = self.pieces.values().collect();
        pieces.sort_by_key(|p| p.seq);
        pieces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
