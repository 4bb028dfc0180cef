//! Axis-aligned bounds and the snap resolver.
//!
//! Snapping runs once per drag end: the dragged piece's bounds are tested
//! against the anchor cells in layout order and the piece is re-centred on the
//! chosen cell. Everything here is local-space geometry.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::AnchorCell;
use crate::viewport::LocalPoint;

/// Axis-aligned bounding box in local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    /// Bounds of a box centred on `center` with the given half extents.
    #[must_use]
    pub fn from_center(center: LocalPoint, half_x: f64, half_y: f64) -> Self {
        Self {
            left: center.x - half_x,
            top: center.y - half_y,
            right: center.x + half_x,
            bottom: center.y + half_y,
        }
    }

    /// Bounds of an anchor cell.
    #[must_use]
    pub fn of_cell(cell: &AnchorCell) -> Self {
        Self { left: cell.x, top: cell.y, right: cell.x + cell.side, bottom: cell.y + cell.side }
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left < other.right && self.right > other.left && self.top < other.bottom && self.bottom > other.top
    }

    /// Whether `point` lies inside or on the edge of the box.
    #[must_use]
    pub fn contains(&self, point: LocalPoint) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    #[must_use]
    pub fn center(&self) -> LocalPoint {
        LocalPoint::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Which overlapping cell wins when a piece covers several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// First overlapping cell in row-major layout order.
    #[default]
    FirstInScanOrder,
    /// Overlapping cell whose centre is closest to the piece centre; ties go
    /// to the earlier cell in layout order.
    NearestCenter,
}

impl FromStr for SnapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" | "first_in_scan_order" => Ok(Self::FirstInScanOrder),
            "nearest" | "nearest_center" => Ok(Self::NearestCenter),
            other => Err(format!("unknown snap policy: {other}")),
        }
    }
}

/// Pick the anchor cell a piece with `bounds` should snap to, if any.
#[must_use]
pub fn resolve<'a>(bounds: &Bounds, cells: &'a [AnchorCell], policy: SnapPolicy) -> Option<&'a AnchorCell> {
    let mut hits = cells.iter().filter(|cell| bounds.overlaps(&Bounds::of_cell(cell)));
    match policy {
        SnapPolicy::FirstInScanOrder => hits.next(),
        SnapPolicy::NearestCenter => {
            let center = bounds.center();
            let mut best: Option<(&AnchorCell, f64)> = None;
            for cell in hits {
                let dist = center.distance_sq(cell.center());
                match best {
                    Some((_, best_dist)) if dist >= best_dist => {}
                    _ => best = Some((cell, dist)),
                }
            }
            best.map(|(cell, _)| cell)
        }
    }
}
