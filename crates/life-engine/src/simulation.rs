//! Simulation runner: builds the first generation and drives the engine.

use crate::engine::SimulationEngine;
use crate::grid::Grid;
use crate::patterns::{BundledPatterns, FilePatternSource, PatternDataSource, PatternLibrary};
use life_core::{InitialState, Result, SimulationConfig, StepReport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, instrument};

/// Generation limit used by [`Simulation::run`] when the config sets none
pub const DEFAULT_RUN_LIMIT: u64 = 1000;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    GenerationLimit,
    /// The grid repeated a state seen within the cycle window
    Cycle,
    Extinct,
    /// Stopped from outside, e.g. by a shutdown signal
    Interrupted,
}

/// Totals for a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub generations: u64,
    pub final_population: usize,
    pub total_births: u64,
    pub total_survivals: u64,
    pub stop_reason: StopReason,
}

pub struct Simulation {
    engine: SimulationEngine,
    config: SimulationConfig,
    /// Fingerprints and contents of the last `cycle_window` generations
    recent: VecDeque<(u64, Grid)>,
    cycling: bool,
    total_births: u64,
    total_survivals: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = initial_grid(&config)?;
        Ok(Self::from_grid(grid, config))
    }

    /// Wrap an existing grid; `config.grid` and `config.initial` are ignored
    pub fn from_grid(grid: Grid, config: SimulationConfig) -> Self {
        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            population = grid.population(),
            "Simulation created"
        );

        let mut sim = Self {
            engine: SimulationEngine::new(grid),
            recent: VecDeque::with_capacity(config.cycle_window),
            config,
            cycling: false,
            total_births: 0,
            total_survivals: 0,
        };
        sim.remember();
        sim
    }

    /// Advance one generation
    pub fn step(&mut self) -> StepReport {
        let stats = self.engine.apply_rules();
        self.total_births += stats.births as u64;
        self.total_survivals += stats.survivals as u64;

        self.cycling = self.seen_recently(self.engine.grid());
        self.remember();

        let report = StepReport::new(self.engine.generation(), stats);
        debug!(
            generation = report.generation,
            births = report.births,
            survivals = report.survivals,
            population = report.population,
            "{}",
            report
        );

        if self.config.log_interval > 0 && report.generation % self.config.log_interval == 0 {
            info!(
                "Generation {}: {} alive ({} born, {} survived)",
                report.generation, report.population, report.births, report.survivals
            );
        }

        report
    }

    /// Run until the generation limit, a repeated state, or extinction
    #[instrument(skip(self), fields(limit = ?self.config.max_generations))]
    pub fn run(&mut self) -> SimulationSummary {
        let limit = self.config.max_generations.unwrap_or(DEFAULT_RUN_LIMIT);
        info!("Starting simulation for up to {} generations", limit);

        let stop_reason = loop {
            if self.engine.generation() >= limit {
                break StopReason::GenerationLimit;
            }
            let report = self.step();
            if report.population == 0 {
                break StopReason::Extinct;
            }
            if self.cycling {
                break StopReason::Cycle;
            }
        };

        let summary = self.summary(stop_reason);
        info!(
            event = "run_summary",
            generations = summary.generations,
            final_population = summary.final_population,
            total_births = summary.total_births,
            total_survivals = summary.total_survivals,
            stop_reason = ?summary.stop_reason,
            "Simulation finished"
        );
        summary
    }

    pub fn summary(&self, stop_reason: StopReason) -> SimulationSummary {
        SimulationSummary {
            generations: self.engine.generation(),
            final_population: self.engine.grid().population(),
            total_births: self.total_births,
            total_survivals: self.total_survivals,
            stop_reason,
        }
    }

    /// The last step produced a grid already seen within the cycle window
    pub fn is_cycling(&self) -> bool {
        self.cycling
    }

    /// The configured generation limit has been reached
    pub fn is_finished(&self) -> bool {
        self.config
            .max_generations
            .is_some_and(|limit| self.engine.generation() >= limit)
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        self.engine.snapshot()
    }

    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// A matching fingerprint only counts when the stored grid is equal too
    fn seen_recently(&self, grid: &Grid) -> bool {
        let fingerprint = grid.fingerprint();
        self.recent
            .iter()
            .any(|(seen, previous)| *seen == fingerprint && previous == grid)
    }

    fn remember(&mut self) {
        if self.config.cycle_window == 0 {
            return;
        }
        if self.recent.len() == self.config.cycle_window {
            self.recent.pop_front();
        }
        let grid = self.engine.grid();
        self.recent.push_back((grid.fingerprint(), grid.clone()));
    }
}

/// Pattern library selected by the config
pub fn library_for(config: &SimulationConfig) -> Result<PatternLibrary> {
    let source: Box<dyn PatternDataSource> = match &config.pattern_file {
        Some(path) => Box::new(FilePatternSource::new(path)),
        None => Box::new(BundledPatterns),
    };
    PatternLibrary::new(source.as_ref())
}

fn initial_grid(config: &SimulationConfig) -> Result<Grid> {
    let (rows, cols) = (config.grid.rows, config.grid.cols);

    match &config.initial {
        InitialState::Random { seed, density } => {
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);
            Grid::random(rows, cols, *density, &mut rng)
        }
        InitialState::Seeded { placements } => {
            let library = library_for(config)?;
            let mut grid = Grid::new(rows, cols)?;
            for placement in placements {
                library.plant_seed(&placement.seed, &mut grid, placement.origin)?;
            }
            Ok(grid)
        }
    }
}
