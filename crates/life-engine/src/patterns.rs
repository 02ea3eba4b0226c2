//! Named seed patterns and their placement onto a grid.
//!
//! Pattern definitions reach the library only through a [`PatternDataSource`].
//! Two sources exist: the catalog bundled into this crate, and a catalog file
//! at an explicit location. Both use the same JSON layout:
//!
//! ```json
//! { "patterns": [ { "name": "glider", "category": "spaceship",
//!                   "cells": [[0, 1], [1, 2], [2, 0], [2, 1], [2, 2]] } ] }
//! ```

use crate::grid::Grid;
use life_core::{CellCoordinate, Error, NamedPattern, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up by [`FilePatternSource::in_dir`]
pub const DEFAULT_CATALOG_FILE: &str = "patterns.json";

const BUNDLED_CATALOG: &str = include_str!("../patterns/catalog.json");

/// On-disk layout of a pattern catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternCatalog {
    pub patterns: Vec<NamedPattern>,
}

impl PatternCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Supplies pattern definitions to a [`PatternLibrary`]
pub trait PatternDataSource {
    fn load(&self) -> Result<Vec<NamedPattern>>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// The catalog compiled into the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledPatterns;

impl PatternDataSource for BundledPatterns {
    fn load(&self) -> Result<Vec<NamedPattern>> {
        Ok(PatternCatalog::from_json(BUNDLED_CATALOG)?.patterns)
    }

    fn describe(&self) -> String {
        "bundled catalog".to_string()
    }
}

/// A catalog read from a JSON file
#[derive(Debug, Clone)]
pub struct FilePatternSource {
    path: PathBuf,
}

impl FilePatternSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Catalog named [`DEFAULT_CATALOG_FILE`] inside `base_dir`
    pub fn in_dir(base_dir: impl AsRef<Path>) -> Self {
        Self::new(base_dir.as_ref().join(DEFAULT_CATALOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PatternDataSource for FilePatternSource {
    fn load(&self) -> Result<Vec<NamedPattern>> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(PatternCatalog::from_json(&json)?.patterns)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Immutable registry of named seeds
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: HashMap<String, NamedPattern>,
}

impl PatternLibrary {
    /// Load every pattern from `source` once
    pub fn new(source: &dyn PatternDataSource) -> Result<Self> {
        let mut patterns = HashMap::new();

        for pattern in source.load()? {
            if pattern.name.is_empty() {
                return Err(Error::InvalidPattern("pattern with empty name".to_string()));
            }
            if pattern.cells.is_empty() {
                return Err(Error::InvalidPattern(format!(
                    "pattern '{}' has no cells",
                    pattern.name
                )));
            }
            if patterns.contains_key(&pattern.name) {
                return Err(Error::InvalidPattern(format!(
                    "duplicate pattern '{}'",
                    pattern.name
                )));
            }
            patterns.insert(pattern.name.clone(), pattern);
        }

        info!(
            source = %source.describe(),
            count = patterns.len(),
            "Loaded pattern catalog"
        );

        Ok(Self { patterns })
    }

    pub fn bundled() -> Result<Self> {
        Self::new(&BundledPatterns)
    }

    pub fn lookup_pattern(&self, name: &str) -> Option<&NamedPattern> {
        self.patterns.get(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Stamp the named seed onto `grid` with its offsets relative to `origin`.
    ///
    /// Every target cell is checked before anything is written, so a failed
    /// placement leaves the grid untouched. Returns the number of cells set.
    pub fn plant_seed(&self, name: &str, grid: &mut Grid, origin: CellCoordinate) -> Result<usize> {
        let pattern = self.lookup_pattern(name).ok_or_else(|| Error::UnknownSeed {
            name: name.to_string(),
            valid: self.names().into_iter().map(str::to_string).collect(),
        })?;

        let targets = pattern
            .cells
            .iter()
            .map(|&offset| resolve(grid, origin, offset))
            .collect::<Result<Vec<_>>>()?;

        for &(row, col) in &targets {
            grid.mark_alive(row, col);
        }

        debug!(
            seed = name,
            category = %pattern.category,
            origin = %origin,
            cells = targets.len(),
            "Planted seed"
        );

        Ok(targets.len())
    }
}

/// Map an offset from `origin` to a grid index, rejecting anything off the grid
fn resolve(grid: &Grid, origin: CellCoordinate, offset: CellCoordinate) -> Result<(usize, usize)> {
    let out_of_bounds = || Error::OutOfBounds {
        row: origin.row as i64 + offset.row as i64,
        col: origin.col as i64 + offset.col as i64,
        rows: grid.rows(),
        cols: grid.cols(),
    };

    let target = origin.offset(offset).ok_or_else(out_of_bounds)?;
    let row = usize::try_from(target.row).map_err(|_| out_of_bounds())?;
    let col = usize::try_from(target.col).map_err(|_| out_of_bounds())?;

    if row >= grid.rows() || col >= grid.cols() {
        return Err(out_of_bounds());
    }

    Ok((row, col))
}
