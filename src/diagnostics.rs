//! Read-only board snapshot for a diagnostics overlay.

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod diagnostics_test;

use serde::Serialize;

use crate::consts::{OVERLAY_MARGIN_PX, OVERLAY_RIGHT_INSET_PX};
use crate::ledger::SpawnLedger;
use crate::piece::PieceKind;
use crate::viewport::{LocalPoint, ScaleState};

/// Live count against the quota for one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindCount {
    pub kind: PieceKind,
    pub label: String,
    pub count: usize,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardDiagnostics {
    /// Current viewport size in screen pixels.
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub scale: ScaleState,
    pub total: usize,
    pub max_total: usize,
    pub per_kind: Vec<KindCount>,
    /// Where the overlay's top-right anchor sits in local space, so it stays a
    /// fixed pixel distance from the viewport's top-right corner at any scale.
    pub overlay_anchor: LocalPoint,
}

impl BoardDiagnostics {
    #[must_use]
    pub fn capture(scale: ScaleState, canvas_size: (f64, f64), ledger: &SpawnLedger) -> Self {
        let quotas = ledger.quotas();
        let per_kind = ledger
            .counts()
            .into_iter()
            .map(|(kind, count)| KindCount { kind, label: kind.abbreviation(), count, max: quotas.max_per_kind })
            .collect();
        Self {
            canvas_width: canvas_size.0,
            canvas_height: canvas_size.1,
            scale,
            total: ledger.total(),
            max_total: quotas.max_total,
            per_kind,
            overlay_anchor: overlay_anchor(&scale),
        }
    }

    /// One-line summary, e.g. `Canvas: 1000x800 | Total: 3/20 | S.B: 1/5 | ...`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut parts = vec![
            format!("Canvas: {}x{}", self.canvas_width.round(), self.canvas_height.round()),
            format!("Total: {}/{}", self.total, self.max_total),
        ];
        parts.extend(self.per_kind.iter().map(|k| format!("{}: {}/{}", k.label, k.count, k.max)));
        parts.join(" | ")
    }
}

fn overlay_anchor(scale: &ScaleState) -> LocalPoint {
    LocalPoint::new(
        scale.initial_width - scale.screen_dx_to_local(OVERLAY_MARGIN_PX + OVERLAY_RIGHT_INSET_PX),
        scale.screen_dy_to_local(OVERLAY_MARGIN_PX),
    )
}
