//! Board configuration with environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_GRID_CELLS;
use crate::grid::GridSpec;
use crate::ledger::Quotas;
use crate::snap::SnapPolicy;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Parse { key: &'static str, value: String },
    #[error("invalid board config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    pub grid: GridSpec,
    pub quotas: Quotas,
    pub snap_policy: SnapPolicy,
}

impl BoardConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `PLACEBOARD_GRID_ROWS`: default 12
    /// - `PLACEBOARD_GRID_COLS`: default 12
    /// - `PLACEBOARD_GRID_MARGIN`: default 50
    /// - `PLACEBOARD_CELL_SPACING`: default 2
    /// - `PLACEBOARD_MAX_TOTAL`: default 20
    /// - `PLACEBOARD_MAX_PER_KIND`: default 5
    /// - `PLACEBOARD_SNAP_POLICY`: `first` (default) or `nearest`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let grid = GridSpec {
            rows: parse_or(&lookup, "PLACEBOARD_GRID_ROWS", defaults.grid.rows)?,
            cols: parse_or(&lookup, "PLACEBOARD_GRID_COLS", defaults.grid.cols)?,
            margin: parse_or(&lookup, "PLACEBOARD_GRID_MARGIN", defaults.grid.margin)?,
            spacing: parse_or(&lookup, "PLACEBOARD_CELL_SPACING", defaults.grid.spacing)?,
        };
        let quotas = Quotas {
            max_total: parse_or(&lookup, "PLACEBOARD_MAX_TOTAL", defaults.quotas.max_total)?,
            max_per_kind: parse_or(&lookup, "PLACEBOARD_MAX_PER_KIND", defaults.quotas.max_per_kind)?,
        };
        let snap_policy = parse_or(&lookup, "PLACEBOARD_SNAP_POLICY", defaults.snap_policy)?;

        let config = Self { grid, quotas, snap_policy };
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the layout engine cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one row and column (got {}x{})",
                self.grid.rows, self.grid.cols
            )));
        }
        if self.grid.cell_count() > MAX_GRID_CELLS {
            return Err(ConfigError::Invalid(format!(
                "grid must have at most {MAX_GRID_CELLS} cells (got {}x{})",
                self.grid.rows, self.grid.cols
            )));
        }
        if !self.grid.margin.is_finite() || self.grid.margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "margin must be a non-negative number (got {})",
                self.grid.margin
            )));
        }
        if !self.grid.spacing.is_finite() || self.grid.spacing < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spacing must be a non-negative number (got {})",
                self.grid.spacing
            )));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed.parse::<T>().map_err(|_| ConfigError::Parse { key, value: raw.clone() })
}
