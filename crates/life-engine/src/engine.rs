//! B3/S23 transition over a bounded grid.

use crate::grid::Grid;
use life_core::{Cell, GenerationStats, StepReport};
use tracing::trace;

/// Moore-neighborhood offsets
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Alive-neighbor counts for the interior of a grid.
///
/// Entry `(r, c)` belongs to grid cell `(r + 1, c + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborCounts {
    rows: usize,
    cols: usize,
    counts: Vec<u8>,
}

impl NeighborCounts {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.rows && col < self.cols {
            Some(self.counts[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.counts
    }
}

/// Owns a grid and advances it one generation at a time
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    grid: Grid,
    generation: u64,
    last_stats: Option<GenerationStats>,
}

impl SimulationEngine {
    /// Grids smaller than 3x3 are accepted; they have no interior and every step is a no-op.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            generation: 0,
            last_stats: None,
        }
    }

    /// Count alive neighbors of every interior cell in the current generation
    pub fn count_neighbors(&self) -> NeighborCounts {
        let grid = &self.grid;
        let rows = grid.rows().saturating_sub(2);
        let cols = grid.cols().saturating_sub(2);
        let mut counts = Vec::with_capacity(rows * cols);

        for row in grid.interior_rows() {
            for col in grid.interior_cols() {
                let n: u8 = NEIGHBORS
                    .iter()
                    .map(|&(dr, dc)| {
                        grid.value_at(
                            row.wrapping_add_signed(dr),
                            col.wrapping_add_signed(dc),
                        )
                    })
                    .sum();
                counts.push(n);
            }
        }

        NeighborCounts { rows, cols, counts }
    }

    /// Advance one generation.
    ///
    /// Counting and classification read only the pre-step grid; the grid is
    /// rewritten afterwards, and border cells always end up dead.
    pub fn apply_rules(&mut self) -> GenerationStats {
        let counts = self.count_neighbors();
        let mut next_alive = Vec::new();
        let mut stats = GenerationStats::default();

        for (i, &n) in counts.as_slice().iter().enumerate() {
            let row = i / counts.cols + 1;
            let col = i % counts.cols + 1;
            let cell = self.grid.cell_at(row, col);
            debug_assert!(matches!(cell, Cell::Dead | Cell::Alive));

            let birth = n == 3 && cell == Cell::Dead;
            let survive = (n == 2 || n == 3) && cell == Cell::Alive;

            if birth {
                stats.births += 1;
            }
            if survive {
                stats.survivals += 1;
            }
            if birth || survive {
                next_alive.push((row, col));
            }
        }

        self.grid.clear();
        for (row, col) in next_alive {
            self.grid.mark_alive(row, col);
        }

        self.generation += 1;
        self.last_stats = Some(stats);

        trace!(
            generation = self.generation,
            births = stats.births,
            survivals = stats.survivals,
            "Applied rules"
        );

        stats
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Copy of the current grid for a renderer
    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        self.grid.snapshot()
    }

    /// Number of steps applied so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_stats(&self) -> Option<GenerationStats> {
        self.last_stats
    }

    /// Telemetry for the most recent step, if any
    pub fn report(&self) -> Option<StepReport> {
        self.last_stats
            .map(|stats| StepReport::new(self.generation, stats))
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_with(rows: usize, cols: usize, alive: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        for &(r, c) in alive {
            grid.set(r, c, Cell::Alive).unwrap();
        }
        grid
    }

    fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                if grid.get(r, c) == Some(Cell::Alive) {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    fn border_is_dead(grid: &Grid) -> bool {
        (0..grid.rows()).all(|r| {
            (0..grid.cols()).all(|c| !grid.is_border(r, c) || grid.get(r, c) == Some(Cell::Dead))
        })
    }

    #[test]
    fn test_dead_grid_is_fixed_point() {
        let mut engine = SimulationEngine::new(Grid::new(3, 3).unwrap());
        let stats = engine.apply_rules();
        assert_eq!(stats, GenerationStats { births: 0, survivals: 0 });
        assert_eq!(engine.grid().population(), 0);
    }

    #[test]
    fn test_isolated_cell_dies() {
        let mut engine = SimulationEngine::new(grid_with(5, 5, &[(2, 2)]));
        let stats = engine.apply_rules();
        assert_eq!(stats.births, 0);
        assert_eq!(stats.survivals, 0);
        assert_eq!(engine.grid().get(2, 2), Some(Cell::Dead));
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = [(3, 2), (3, 3), (3, 4)];
        let vertical = [(2, 3), (3, 3), (4, 3)];
        let mut engine = SimulationEngine::new(grid_with(7, 7, &horizontal));

        let stats = engine.apply_rules();
        assert_eq!(alive_cells(engine.grid()), vertical.to_vec());
        assert_eq!(stats, GenerationStats { births: 2, survivals: 1 });

        engine.apply_rules();
        assert_eq!(alive_cells(engine.grid()), horizontal.to_vec());
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_block_is_still_life() {
        let block = [(3, 3), (3, 4), (4, 3), (4, 4)];
        let mut engine = SimulationEngine::new(grid_with(8, 8, &block));

        for _ in 0..20 {
            let stats = engine.apply_rules();
            assert_eq!(stats, GenerationStats { births: 0, survivals: 4 });
        }
        assert_eq!(alive_cells(engine.grid()), block.to_vec());
    }

    #[test]
    fn test_neighbor_counts_of_blinker() {
        let engine = SimulationEngine::new(grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]));
        let counts = engine.count_neighbors();
        assert_eq!(counts.rows(), 3);
        assert_eq!(counts.cols(), 3);
        // Interior offsets: grid (r, c) -> counts (r - 1, c - 1)
        assert_eq!(counts.get(1, 1), Some(2));
        assert_eq!(counts.get(0, 1), Some(3));
        assert_eq!(counts.get(2, 1), Some(3));
        assert_eq!(counts.get(1, 0), Some(1));
        assert_eq!(counts.get(0, 0), Some(2));
        assert_eq!(counts.get(3, 0), None);
    }

    #[test]
    fn test_counts_include_border_cells() {
        // Border cells are read as neighbors even though they are never updated
        let engine = SimulationEngine::new(grid_with(3, 3, &[(0, 0), (0, 1), (0, 2)]));
        assert_eq!(engine.count_neighbors().get(0, 0), Some(3));
    }

    #[test]
    fn test_border_cells_are_cleared() {
        let mut engine = SimulationEngine::new(grid_with(3, 3, &[(0, 0), (0, 1), (0, 2)]));
        let stats = engine.apply_rules();
        // The centre is born from the live border row, the border itself dies
        assert_eq!(stats.births, 1);
        assert_eq!(alive_cells(engine.grid()), vec![(1, 1)]);
    }

    #[test]
    fn test_glider_stops_at_border() {
        let glider = [(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)];
        let mut engine = SimulationEngine::new(grid_with(8, 8, &glider));
        for _ in 0..40 {
            engine.apply_rules();
            assert!(border_is_dead(engine.grid()));
        }
        // A glider cannot pass through the border; it collapses into a block in the corner
        assert_eq!(engine.grid().population(), 4);
    }

    #[test]
    fn test_degenerate_grids_step_without_failure() {
        for (rows, cols) in [(1, 1), (1, 5), (2, 2), (2, 7), (6, 2)] {
            let grid = Grid::from_rows(vec![vec![1; cols]; rows]).unwrap();
            let mut engine = SimulationEngine::new(grid);
            let stats = engine.apply_rules();
            assert_eq!(stats, GenerationStats::default());
            assert_eq!(engine.grid().population(), 0);
            assert_eq!(engine.count_neighbors().as_slice().len(), 0);
        }
    }

    #[test]
    fn test_report_tracks_generation() {
        let mut engine = SimulationEngine::new(grid_with(6, 6, &[(2, 2), (2, 3), (3, 2), (3, 3)]));
        assert!(engine.report().is_none());
        engine.apply_rules();
        engine.apply_rules();
        let report = engine.report().unwrap();
        assert_eq!(report.generation, 2);
        assert_eq!(report.survivals, 4);
        assert_eq!(report.population, 4);
    }

    #[test]
    fn test_into_grid_returns_state() {
        let mut engine = SimulationEngine::new(grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]));
        engine.apply_rules();
        let snapshot = engine.snapshot();
        let grid = engine.into_grid();
        assert_eq!(grid.snapshot(), snapshot);
        assert_eq!(snapshot[1][2], 1);
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..12, 1usize..12).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(proptest::collection::vec(0u8..=1, cols), rows)
                .prop_map(|rows| Grid::from_rows(rows).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_border_never_alive(grid in arb_grid(), steps in 1usize..10) {
            let mut engine = SimulationEngine::new(grid);
            for _ in 0..steps {
                engine.apply_rules();
                prop_assert!(border_is_dead(engine.grid()));
            }
        }

        #[test]
        fn prop_population_matches_stats(grid in arb_grid()) {
            let mut engine = SimulationEngine::new(grid);
            let stats = engine.apply_rules();
            prop_assert_eq!(engine.grid().population(), stats.population());
        }

        #[test]
        fn prop_transition_is_deterministic(grid in arb_grid(), steps in 1usize..8) {
            let mut a = SimulationEngine::new(grid.clone());
            let mut b = SimulationEngine::new(grid);
            for _ in 0..steps {
                prop_assert_eq!(a.apply_rules(), b.apply_rules());
                prop_assert_eq!(a.grid(), b.grid());
            }
        }

        #[test]
        fn prop_counts_bounded(grid in arb_grid()) {
            let engine = SimulationEngine::new(grid);
            prop_assert!(engine.count_neighbors().as_slice().iter().all(|&n| n <= 8));
        }
    }
}
