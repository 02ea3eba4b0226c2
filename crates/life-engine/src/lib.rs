//! Game of Life simulation engine.
//!
//! This crate owns the bounded grid, the B3/S23 transition and the named seed
//! catalog used to build non-random starting boards.

pub mod grid;
pub mod engine;
pub mod patterns;
pub mod simulation;

pub use grid::Grid;
pub use engine::{NeighborCounts, SimulationEngine};
pub use patterns::{BundledPatterns, FilePatternSource, PatternDataSource, PatternLibrary};
pub use simulation::{library_for, Simulation, SimulationSummary, StopReason};
