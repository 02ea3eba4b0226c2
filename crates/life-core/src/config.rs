//! Configuration types for the simulation.

use crate::{CellCoordinate, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows, border included
    pub rows: usize,
    /// Number of columns, border included
    pub cols: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { rows: 50, cols: 50 }
    }
}

/// One named seed stamped at an origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPlacement {
    pub seed: String,
    pub origin: CellCoordinate,
}

/// How the first generation is produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialState {
    /// Each cell alive with probability `density`
    Random { seed: u64, density: f64 },
    /// Named patterns placed on an empty grid
    Seeded { placements: Vec<SeedPlacement> },
}

impl Default for InitialState {
    fn default() -> Self {
        InitialState::Random {
            seed: 0,
            density: 0.5,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub initial: InitialState,
    /// Pattern catalog file; the bundled catalog is used when unset
    pub pattern_file: Option<PathBuf>,
    /// Stop after this many generations (unbounded when unset)
    pub max_generations: Option<u64>,
    /// Emit an info-level progress line every N generations
    pub log_interval: u64,
    /// Number of recent grid fingerprints kept for cycle detection (0 disables)
    pub cycle_window: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            initial: InitialState::default(),
            pattern_file: None,
            max_generations: None,
            log_interval: 100,
            cycle_window: 10,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = (self.grid.rows, self.grid.cols);
        if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none() {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        if let InitialState::Random { density, .. } = self.initial {
            if !(0.0..=1.0).contains(&density) {
                return Err(Error::InvalidConfig(format!(
                    "density {} is outside [0, 1]",
                    density
                )));
            }
        }

        Ok(())
    }
}

/// Driver (terminal front end) configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub simulation: SimulationConfig,
    /// Delay between frames (milliseconds)
    pub frame_interval_ms: u64,
    /// Draw each generation to the terminal
    pub render: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            frame_interval_ms: 50,
            render: true,
        }
    }
}

impl DriverConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DriverConfig = serde_json::from_str(json)?;
        config.simulation.validate()?;
        Ok(config)
    }
}
