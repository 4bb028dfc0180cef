//! Shared numeric constants for the board.

// ── Grid ────────────────────────────────────────────────────────

/// Default number of anchor rows.
pub const GRID_ROWS: u32 = 12;

/// Default number of anchor columns.
pub const GRID_COLS: u32 = 12;

/// Default distance from the canvas edge to the grid, in local units.
pub const GRID_MARGIN: f64 = 50.0;

/// Default gap between neighbouring anchor cells, in local units.
pub const CELL_SPACING: f64 = 2.0;

/// Largest grid the layout will allocate, as `rows * cols`.
pub const MAX_GRID_CELLS: u64 = 10_000;

/// Smallest cell side the layout will emit, even for a cramped canvas.
pub const MIN_CELL_SIDE: f64 = 5.0;

/// Smallest spawned piece side.
pub const MIN_SPAWN_SIDE: f64 = 4.0;

/// Spawned piece side as a fraction of the anchor cell side.
pub const SPAWN_SIDE_RATIO: f64 = 0.8;

// ── Quotas ──────────────────────────────────────────────────────

/// Default maximum number of live pieces on the board.
pub const MAX_TOTAL: usize = 20;

/// Default maximum number of live pieces of a single kind.
pub const MAX_PER_KIND: usize = 5;

// ── Pieces ──────────────────────────────────────────────────────

/// Rotation applied by a single rotate action, in degrees.
pub const ROTATION_STEP_DEG: f64 = 90.0;

/// Opacity of a piece while it is being dragged.
pub const DRAG_ALPHA: f64 = 0.7;

/// Opacity of a piece at rest.
pub const REST_ALPHA: f64 = 1.0;

// ── Diagnostics ─────────────────────────────────────────────────

/// Screen-space margin between the diagnostics overlay and the canvas edge.
pub const OVERLAY_MARGIN_PX: f64 = 10.0;

/// Extra right-hand inset for the diagnostics overlay, in screen pixels.
pub const OVERLAY_RIGHT_INSET_PX: f64 = 20.0;
