//! Spawn quotas and live piece identities.
//!
//! DESIGN
//! ======
//! Two bounds are enforced on live pieces:
//! - Overall: at most `max_total` pieces on the board.
//! - Per kind: at most `max_per_kind` pieces of any one kind.
//!
//! The overall bound is checked first, so a full board always reports
//! `max-total` even when the requested kind is also exhausted. Ids are unique
//! among live pieces only; a released id may in principle come back.

#[cfg(test)]
#[path = "ledger_test.rs"]
mod ledger_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::consts::{MAX_PER_KIND, MAX_TOTAL};
use crate::piece::{PieceId, PieceKind};

/// Quota limits for live pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotas {
    pub max_total: usize,
    pub max_per_kind: usize,
}

impl Default for Quotas {
    fn default() -> Self {
        Self { max_total: MAX_TOTAL, max_per_kind: MAX_PER_KIND }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnRejection {
    #[error("overall maximum spawned pieces reached ({max})")]
    MaxTotal { max: usize },
    #[error("max spawns reached for {kind} ({max})")]
    MaxPerKind { kind: PieceKind, max: usize },
}

impl SpawnRejection {
    /// Stable machine-readable code for the bound that was hit.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MaxTotal { .. } => "max-total",
            Self::MaxPerKind { .. } => "max-per-type",
        }
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// Per-kind and overall spawn counters plus the live id registry.
#[derive(Debug, Clone)]
pub struct SpawnLedger {
    quotas: Quotas,
    per_kind: HashMap<PieceKind, usize>,
    live: HashMap<PieceId, PieceKind>,
}

impl SpawnLedger {
    #[must_use]
    pub fn new(quotas: Quotas) -> Self {
        Self { quotas, per_kind: zeroed_counts(), live: HashMap::new() }
    }

    /// Check whether a piece of `kind` could be reserved right now.
    pub fn can_reserve(&self, kind: PieceKind) -> Result<(), SpawnRejection> {
        if self.live.len() >= self.quotas.max_total {
            return Err(SpawnRejection::MaxTotal { max: self.quotas.max_total });
        }
        if self.count(kind) >= self.quotas.max_per_kind {
            return Err(SpawnRejection::MaxPerKind { kind, max: self.quotas.max_per_kind });
        }
        Ok(())
    }

    /// Reserve a slot for a piece of `kind` and allocate its id.
    pub fn try_reserve(&mut self, kind: PieceKind) -> Result<PieceId, SpawnRejection> {
        if let Err(rejection) = self.can_reserve(kind) {
            warn!(%kind, code = rejection.code(), "spawn rejected: {rejection}");
            return Err(rejection);
        }

        let mut id = Uuid::new_v4();
        while self.live.contains_key(&id) {
            id = Uuid::new_v4();
        }
        self.live.insert(id, kind);
        *self.per_kind.entry(kind).or_default() += 1;

        debug!(%kind, %id, total = self.live.len(), "spawn reserved");
        Ok(id)
    }

    /// Release a live piece. Returns its kind, or `None` for an unknown id.
    pub fn release(&mut self, id: &PieceId) -> Option<PieceKind> {
        let kind = self.live.remove(id)?;
        let count = self.per_kind.entry(kind).or_default();
        *count = count.saturating_sub(1);
        debug!(%kind, %id, total = self.live.len(), "spawn released");
        Some(kind)
    }

    /// Forget every live piece and zero all counters.
    pub fn release_all(&mut self) {
        let released = self.live.len();
        self.live.clear();
        self.per_kind = zeroed_counts();
        info!(released, "all spawns released");
    }

    /// Live pieces of `kind`.
    #[must_use]
    pub fn count(&self, kind: PieceKind) -> usize {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Live pieces of every kind.
    #[must_use]
    pub fn total(&self) -> usize {
        self.live.len()
    }

    /// Kind of a live piece.
    #[must_use]
    pub fn kind_of(&self, id: &PieceId) -> Option<PieceKind> {
        self.live.get(id).copied()
    }

    #[must_use]
    pub fn quotas(&self) -> Quotas {
        self.quotas
    }

    /// `(kind, count)` for every kind in toolbar order.
    #[must_use]
    pub fn counts(&self) -> Vec<(PieceKind, usize)> {
        PieceKind::ALL.into_iter().map(|kind| (kind, self.count(kind))).collect()
    }
}

impl Default for SpawnLedger {
    fn default() -> Self {
        Self::new(Quotas::default())
    }
}

fn zeroed_counts() -> HashMap<PieceKind, usize> {
    PieceKind::ALL.into_iter().map(|kind| (kind, 0)).collect()
}
