//! Viewport scale tracking and screen/local coordinate conversion.
//!
//! The board keeps all geometry in the local space captured at startup. When
//! the host viewport grows or shrinks, the board is stretched through a
//! rendering transform rather than re-laid out, so the only thing that changes
//! is the ratio between screen pixels and local units. [`ScaleTracker`] owns
//! that ratio and [`ScaleState::screen_to_local`] is the one place it is
//! applied to pointer input.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A point in screen space (CSS pixels relative to the canvas origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in the board's unscaled local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(self, other: LocalPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Add for LocalPoint {
    type Output = LocalPoint;

    fn add(self, rhs: LocalPoint) -> LocalPoint {
        LocalPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for LocalPoint {
    type Output = LocalPoint;

    fn sub(self, rhs: LocalPoint) -> LocalPoint {
        LocalPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Baseline canvas size and the current per-axis scale factor.
///
/// `scale_x` / `scale_y` are `current / initial` and start at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    pub initial_width: f64,
    pub initial_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ScaleState {
    /// Baseline at `width` x `height` with identity scale.
    #[must_use]
    pub fn new(initial_width: f64, initial_height: f64) -> Self {
        Self { initial_width, initial_height, scale_x: 1.0, scale_y: 1.0 }
    }

    /// Convert a screen-space point to local board coordinates.
    #[must_use]
    pub fn screen_to_local(&self, screen: ScreenPoint) -> LocalPoint {
        LocalPoint { x: unscale(screen.x, self.scale_x), y: unscale(screen.y, self.scale_y) }
    }

    /// Convert a local board point to screen coordinates.
    #[must_use]
    pub fn local_to_screen(&self, local: LocalPoint) -> ScreenPoint {
        ScreenPoint { x: local.x * self.scale_x, y: local.y * self.scale_y }
    }

    /// Convert a screen-space distance along x to local units.
    #[must_use]
    pub fn screen_dx_to_local(&self, dx: f64) -> f64 {
        unscale(dx, self.scale_x)
    }

    /// Convert a screen-space distance along y to local units.
    #[must_use]
    pub fn screen_dy_to_local(&self, dy: f64) -> f64 {
        unscale(dy, self.scale_y)
    }
}

// A zero or non-finite scale would blow up the division; treat it as identity.
fn unscale(value: f64, scale: f64) -> f64 {
    if scale.is_normal() { value / scale } else { value }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport not initialized")]
    NotInitialized,
    #[error("viewport already initialized at {width}x{height}")]
    AlreadyInitialized { width: f64, height: f64 },
    #[error("invalid canvas size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

/// Records the startup canvas size once and recomputes the scale on resize.
#[derive(Debug, Clone, Default)]
pub struct ScaleTracker {
    state: Option<ScaleState>,
    current_width: f64,
    current_height: f64,
}

impl ScaleTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the baseline canvas size. Only the first call has any effect.
    pub fn initialize(&mut self, width: f64, height: f64) -> Result<ScaleState, ViewportError> {
        if let Some(state) = self.state {
            warn!(
                initial_width = state.initial_width,
                initial_height = state.initial_height,
                "viewport already initialized; ignoring"
            );
            return Err(ViewportError::AlreadyInitialized {
                width: state.initial_width,
                height: state.initial_height,
            });
        }
        if !is_valid_extent(width) || !is_valid_extent(height) {
            warn!(width, height, "refusing to initialize viewport with invalid size");
            return Err(ViewportError::InvalidSize { width, height });
        }
        let state = ScaleState::new(width, height);
        self.state = Some(state);
        self.current_width = width;
        self.current_height = height;
        debug!(width, height, "viewport baseline captured");
        Ok(state)
    }

    /// Recompute the scale for a new viewport size.
    ///
    /// A degenerate new size, or a zero baseline, leaves the previous scale in
    /// place.
    pub fn on_resize(&mut self, width: f64, height: f64) -> Result<ScaleState, ViewportError> {
        let Some(state) = self.state.as_mut() else {
            warn!(width, height, "resize before viewport initialization; ignoring");
            return Err(ViewportError::NotInitialized);
        };
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            warn!(width, height, "ignoring degenerate viewport size");
            return Ok(*state);
        }

        self.current_width = width;
        self.current_height = height;

        if state.initial_width <= 0.0 || state.initial_height <= 0.0 {
            warn!(
                initial_width = state.initial_width,
                initial_height = state.initial_height,
                "zero baseline; keeping previous scale"
            );
            return Ok(*state);
        }

        state.scale_x = width / state.initial_width;
        state.scale_y = height / state.initial_height;
        debug!(width, height, scale_x = state.scale_x, scale_y = state.scale_y, "viewport rescaled");
        Ok(*state)
    }

    /// Whether the baseline has been captured.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// The current scale state, if initialized.
    #[must_use]
    pub fn state(&self) -> Option<ScaleState> {
        self.state
    }

    /// Current viewport size in screen pixels. This is also the hit region.
    #[must_use]
    pub fn current_size(&self) -> (f64, f64) {
        (self.current_width, self.current_height)
    }

    /// Convert a screen point using the current scale (identity before initialization).
    #[must_use]
    pub fn screen_to_local(&self, screen: ScreenPoint) -> LocalPoint {
        match self.state {
            Some(state) => state.screen_to_local(screen),
            None => LocalPoint::new(screen.x, screen.y),
        }
    }
}

fn is_valid_extent(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
