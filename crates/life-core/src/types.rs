//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    /// Numeric value used when summing a neighborhood
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Cell::Dead),
            1 => Some(Cell::Alive),
            _ => None,
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

/// Row/column pair, used both for pattern offsets and placement origins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct CellCoordinate {
    pub row: i32,
    pub col: i32,
}

impl CellCoordinate {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Offset this coordinate, returning `None` on overflow
    pub fn offset(&self, other: CellCoordinate) -> Option<CellCoordinate> {
        Some(Self {
            row: self.row.checked_add(other.row)?,
            col: self.col.checked_add(other.col)?,
        })
    }
}

impl From<(i32, i32)> for CellCoordinate {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl From<CellCoordinate> for (i32, i32) {
    fn from(coord: CellCoordinate) -> Self {
        (coord.row, coord.col)
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Documentation-only grouping of named patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    StillLife,
    Oscillator,
    Spaceship,
    Methuselah,
    Gun,
    Config,
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternCategory::StillLife => "still_life",
            PatternCategory::Oscillator => "oscillator",
            PatternCategory::Spaceship => "spaceship",
            PatternCategory::Methuselah => "methuselah",
            PatternCategory::Gun => "gun",
            PatternCategory::Config => "config",
        };
        f.write_str(name)
    }
}

/// A seed pattern: alive-cell offsets relative to a placement origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPattern {
    pub name: String,
    pub category: PatternCategory,
    pub cells: Vec<CellCoordinate>,
}

impl NamedPattern {
    /// Height and width of the smallest box covering every offset
    pub fn bounding_box(&self) -> (i32, i32) {
        let rows = self.cells.iter().map(|c| c.row);
        let cols = self.cells.iter().map(|c| c.col);
        let height = match (rows.clone().min(), rows.max()) {
            (Some(lo), Some(hi)) => hi - lo + 1,
            _ => 0,
        };
        let width = match (cols.clone().min(), cols.max()) {
            (Some(lo), Some(hi)) => hi - lo + 1,
            _ => 0,
        };
        (height, width)
    }
}

/// Result of a single generation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Dead cells with exactly three alive neighbors
    pub births: usize,
    /// Alive cells with two or three alive neighbors
    pub survivals: usize,
}

impl GenerationStats {
    /// Alive cells after the step
    pub fn population(&self) -> usize {
        self.births + self.survivals
    }
}

/// Per-step telemetry record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub generation: u64,
    pub births: usize,
    pub survivals: usize,
    pub population: usize,
}

impl StepReport {
    pub fn new(generation: u64, stats: GenerationStats) -> Self {
        Self {
            generation,
            births: stats.births,
            survivals: stats.survivals,
            population: stats.population(),
        }
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Life Cycle: {} Birth: {} Survive: {}",
            self.generation, self.births, self.survivals
        )
    }
}
