//! Anchor grid layout.
//!
//! Derives a fixed `rows` x `cols` grid of square anchor cells from the logical
//! canvas size. The grid is laid out once, at board initialization; a viewport
//! resize rescales it visually but never recomputes cell geometry.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::{
    CELL_SPACING, GRID_COLS, GRID_MARGIN, GRID_ROWS, MAX_GRID_CELLS, MIN_CELL_SIDE, MIN_SPAWN_SIDE,
    SPAWN_SIDE_RATIO,
};
use crate::snap::Bounds;
use crate::viewport::LocalPoint;

/// Grid shape and spacing, in local units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    /// Minimum distance from each canvas edge to the grid.
    pub margin: f64,
    /// Gap between neighbouring cells.
    pub spacing: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { rows: GRID_ROWS, cols: GRID_COLS, margin: GRID_MARGIN, spacing: CELL_SPACING }
    }
}

impl GridSpec {
    /// `rows * cols`, without overflow.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

/// A grid slot pieces can snap into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorCell {
    /// Stable id, `anchor-{row}-{col}`.
    pub id: String,
    pub row: u32,
    pub col: u32,
    /// Left edge in local space.
    pub x: f64,
    /// Top edge in local space.
    pub y: f64,
    /// Edge length; cells are always square.
    pub side: f64,
}

impl AnchorCell {
    #[must_use]
    pub fn center(&self) -> LocalPoint {
        let half = self.side * 0.5;
        LocalPoint::new(self.x + half, self.y + half)
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::of_cell(self)
    }
}

/// Id of the anchor cell at `(row, col)`.
#[must_use]
pub fn anchor_id(row: u32, col: u32) -> String {
    format!("anchor-{row}-{col}")
}

/// The result of laying out a grid on a canvas.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GridLayout {
    pub spec: GridSpec,
    /// Cells in row-major order.
    pub cells: Vec<AnchorCell>,
    /// Uniform cell side.
    pub cell_side: f64,
    /// Side of a freshly spawned piece.
    pub spawn_side: f64,
    /// The canvas was too small for the requested grid and the side was clamped.
    pub degenerate: bool,
}

impl GridLayout {
    /// Cell at `(row, col)`, if inside the grid.
    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<&AnchorCell> {
        self.cells.iter().find(|cell| cell.row == row && cell.col == col)
    }

    /// Cell with the given id.
    #[must_use]
    pub fn cell_by_id(&self, id: &str) -> Option<&AnchorCell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Centre of the cell at `(row, col)`.
    #[must_use]
    pub fn cell_center(&self, row: u32, col: u32) -> Option<LocalPoint> {
        self.cell(row, col).map(AnchorCell::center)
    }

    /// `(rows, cols)` of the configured grid.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.spec.rows, self.spec.cols)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Lay out `spec` centred on a `canvas_width` x `canvas_height` canvas.
///
/// Never fails: an unusable spec or canvas produces an empty grid, and a canvas
/// too small for the margins produces a best-effort grid of minimum-size cells.
#[must_use]
pub fn layout(canvas_width: f64, canvas_height: f64, spec: GridSpec) -> GridLayout {
    if spec.rows == 0 || spec.cols == 0 {
        warn!(rows = spec.rows, cols = spec.cols, "grid has no cells; skipping layout");
        return GridLayout { spec, ..GridLayout::default() };
    }
    if spec.cell_count() > MAX_GRID_CELLS {
        warn!(rows = spec.rows, cols = spec.cols, max = MAX_GRID_CELLS, "grid too large; skipping layout");
        return GridLayout { spec, ..GridLayout::default() };
    }
    if !canvas_width.is_finite() || !canvas_height.is_finite() {
        warn!(canvas_width, canvas_height, "non-finite canvas size; skipping layout");
        return GridLayout { spec, ..GridLayout::default() };
    }

    let rows = f64::from(spec.rows);
    let cols = f64::from(spec.cols);

    let available_width = canvas_width - 2.0 * spec.margin;
    let available_height = canvas_height - 2.0 * spec.margin;
    let width_candidate = (available_width - (cols - 1.0) * spec.spacing) / cols;
    let height_candidate = (available_height - (rows - 1.0) * spec.spacing) / rows;

    let raw_side = width_candidate.min(height_candidate).floor();
    let degenerate = raw_side.is_nan() || raw_side < MIN_CELL_SIDE;
    if degenerate {
        warn!(raw_side, canvas_width, canvas_height, "anchor cell side below minimum; clamping");
    }
    let cell_side = if degenerate { MIN_CELL_SIDE } else { raw_side };
    let spawn_side = (cell_side * SPAWN_SIDE_RATIO).floor().max(MIN_SPAWN_SIDE);

    let total_width = cols * cell_side + (cols - 1.0) * spec.spacing;
    let total_height = rows * cell_side + (rows - 1.0) * spec.spacing;
    let offset_x = (canvas_width - total_width) / 2.0;
    let offset_y = (canvas_height - total_height) / 2.0;
    let pitch = cell_side + spec.spacing;

    let mut cells = Vec::with_capacity(grid_capacity(spec));
    for row in 0..spec.rows {
        for col in 0..spec.cols {
            cells.push(AnchorCell {
                id: anchor_id(row, col),
                row,
                col,
                x: offset_x + f64::from(col) * pitch,
                y: offset_y + f64::from(row) * pitch,
                side: cell_side,
            });
        }
    }

    info!(cells = cells.len(), cell_side, spawn_side, "anchor grid laid out");
    GridLayout { spec, cells, cell_side, spawn_side, degenerate }
}

fn grid_capacity(spec: GridSpec) -> usize {
    usize::try_from(spec.cell_count()).unwrap_or(0)
}
