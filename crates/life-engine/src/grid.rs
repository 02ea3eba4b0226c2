//! Bounded 2D grid of cells.

use life_core::{Cell, Error, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// A row-major grid whose outer ring acts as a permanent dead border
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// Unchecked wire form of [`Grid`]
#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let len = cell_count(raw.rows, raw.cols)?;
        if raw.cells.len() != len {
            return Err(Error::InvalidPattern(format!(
                "{}x{} grid needs {} cells, got {}",
                raw.rows,
                raw.cols,
                len,
                raw.cells.len()
            )));
        }

        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            cells: raw.cells,
        })
    }
}

/// Number of cells in a `rows` x `cols` grid; zero or overflowing sizes are rejected
fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(Error::InvalidDimensions { rows, cols })
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = cell_count(rows, cols)?;

        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Dead; len],
        })
    }

    /// Fill a grid at random, each cell alive with probability `density`
    pub fn random(rows: usize, cols: usize, density: f64, rng: &mut ChaCha8Rng) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::InvalidConfig(format!(
                "density {} is outside [0, 1]",
                density
            )));
        }

        let mut grid = Self::new(rows, cols)?;
        for cell in &mut grid.cells {
            let roll = rng.gen::<f64>();
            *cell = Cell::from(roll < density);
        }

        Ok(grid)
    }

    /// Build a grid from rows of 0/1 values
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut grid = Self::new(height, width)?;

        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::InvalidPattern(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    width
                )));
            }
            for (c, &value) in row.iter().enumerate() {
                let cell = Cell::from_value(value).ok_or_else(|| {
                    Error::InvalidPattern(format!("cell ({}, {}) has value {}", r, c, value))
                })?;
                grid.cells[r * width + c] = cell;
            }
        }

        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds {
                row: row as i64,
                col: col as i64,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.cells[row * self.cols + col] = cell;
        Ok(())
    }

    /// Unchecked read for the engine's inner loops
    #[inline]
    pub(crate) fn value_at(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.cols + col].value()
    }

    #[inline]
    pub(crate) fn cell_at(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    #[inline]
    pub(crate) fn mark_alive(&mut self, row: usize, col: usize) {
        self.cells[row * self.cols + col] = Cell::Alive;
    }

    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.rows || col + 1 == self.cols
    }

    /// Rows subject to the transition rule; empty when the grid has fewer than 3 rows
    pub fn interior_rows(&self) -> Range<usize> {
        1..self.rows.saturating_sub(1).max(1)
    }

    /// Columns subject to the transition rule; empty when the grid has fewer than 3 columns
    pub fn interior_cols(&self) -> Range<usize> {
        1..self.cols.saturating_sub(1).max(1)
    }

    /// Number of alive cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Reset every cell to dead
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
    }

    /// Copy of the grid as 0/1 integers, one vector per row
    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.value()).collect())
            .collect()
    }

    /// Iterator over rows of cells
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols)
    }

    /// Content hash, used to spot repeating generations
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 12).unwrap();
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.cols(), 12);
        assert_eq!(grid.cells.len(), 120);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(Error::InvalidDimensions { rows: 0, cols: 5 })
        ));
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert!(matches!(
            Grid::new(usize::MAX, 2),
            Err(Error::InvalidDimensions { cols: 2, .. })
        ));
        let huge = 1usize << (usize::BITS / 2);
        assert!(Grid::new(huge, huge).is_err());
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let grid = Grid::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);

        let missing_cells = r#"{"rows":5,"cols":5,"cells":[]}"#;
        assert!(serde_json::from_str::<Grid>(missing_cells).is_err());

        let zero_cols = r#"{"rows":1,"cols":0,"cells":[]}"#;
        assert!(serde_json::from_str::<Grid>(zero_cols).is_err());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::new(4, 4).unwrap();
        assert!(grid.set(3, 3, Cell::Alive).is_ok());
        assert!(matches!(
            grid.set(4, 0, Cell::Alive),
            Err(Error::OutOfBounds { row: 4, col: 0, .. })
        ));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(3, 3), Some(Cell::Alive));
    }

    #[test]
    fn test_border_and_interior() {
        let grid = Grid::new(5, 6).unwrap();
        assert!(grid.is_border(0, 3));
        assert!(grid.is_border(4, 3));
        assert!(grid.is_border(2, 0));
        assert!(grid.is_border(2, 5));
        assert!(!grid.is_border(2, 2));
        assert_eq!(grid.interior_rows(), 1..4);
        assert_eq!(grid.interior_cols(), 1..5);
    }

    #[test]
    fn test_tiny_grid_has_no_interior() {
        let grid = Grid::new(2, 1).unwrap();
        assert!(grid.interior_rows().is_empty());
        assert!(grid.interior_cols().is_empty());
    }

    #[test]
    fn test_from_rows_and_snapshot() {
        let rows = vec![vec![0, 1, 0], vec![1, 1, 0]];
        let grid = Grid::from_rows(rows.clone()).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.population(), 3);
        assert_eq!(grid.snapshot(), rows);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(Grid::from_rows(vec![]).is_err());
        assert!(Grid::from_rows(vec![vec![0, 1], vec![1]]).is_err());
        assert!(Grid::from_rows(vec![vec![0, 2]]).is_err());
    }

    #[test]
    fn test_random_grid_is_reproducible() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        let a = Grid::random(30, 30, 0.5, &mut rng_a).unwrap();
        let b = Grid::random(30, 30, 0.5, &mut rng_b).unwrap();
        assert_eq!(a, b);

        // Roughly half the cells should be alive
        let population = a.population();
        assert!(population > 300 && population < 600);
    }

    #[test]
    fn test_random_density_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(Grid::random(8, 8, 0.0, &mut rng).unwrap().population(), 0);
        assert_eq!(Grid::random(8, 8, 1.0, &mut rng).unwrap().population(), 64);
        assert!(Grid::random(8, 8, -0.1, &mut rng).is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut grid = Grid::new(6, 6).unwrap();
        let empty = grid.fingerprint();
        grid.set(2, 2, Cell::Alive).unwrap();
        assert_ne!(grid.fingerprint(), empty);
        grid.clear();
        assert_eq!(grid.fingerprint(), empty);
    }
}
