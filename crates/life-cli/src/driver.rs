//! Config loading and the paced step loop.

use crate::render::render_screen;
use anyhow::{Context, Result};
use life_core::{
    CellCoordinate, DriverConfig, Error, InitialState, SeedPlacement, SimulationConfig,
};
use life_engine::{library_for, Simulation, SimulationSummary, StopReason};
use std::future::Future;
use std::env::VarError;
use std::io::Write;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

/// Path of a JSON `DriverConfig`
pub const CONFIG_ENV: &str = "LIFE_CONFIG";
/// Name of a seed to center on the board instead of the configured initial state
pub const SEED_ENV: &str = "LIFE_SEED";

/// Load the driver config from `LIFE_CONFIG`, then apply a `LIFE_SEED` override
pub fn load_config() -> Result<DriverConfig> {
    config_from_vars(std::env::var(CONFIG_ENV), std::env::var(SEED_ENV))
}

/// Build the config from the raw values of the two environment variables
pub fn config_from_vars(
    config_path: std::result::Result<String, VarError>,
    seed: std::result::Result<String, VarError>,
) -> Result<DriverConfig> {
    let mut config = match optional_var(CONFIG_ENV, config_path)? {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path))?;
            DriverConfig::from_json(&json).with_context(|| format!("invalid config file {}", path))?
        }
        None => DriverConfig::default(),
    };

    if let Some(seed) = optional_var(SEED_ENV, seed)? {
        config.simulation.initial = centered_seed(&config.simulation, &seed);
    }

    Ok(config)
}

/// Unset is `None`; a value that is not valid UTF-8 is an error
fn optional_var(name: &str, value: std::result::Result<String, VarError>) -> Result<Option<String>> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err @ VarError::NotUnicode(_)) => Err(err).with_context(|| format!("invalid {}", name)),
    }
}

/// Initial state holding one seed placed in the middle of the board.
///
/// Unknown names are kept as-is so the error surfaces when the board is built.
pub fn centered_seed(config: &SimulationConfig, seed: &str) -> InitialState {
    let (height, width) = library_for(config)
        .ok()
        .and_then(|library| library.lookup_pattern(seed).map(|p| p.bounding_box()))
        .unwrap_or((0, 0));

    InitialState::Seeded {
        placements: vec![SeedPlacement {
            seed: seed.to_string(),
            origin: CellCoordinate::new(
                centered_offset(config.grid.rows, height),
                centered_offset(config.grid.cols, width),
            ),
        }],
    }
}

/// Start offset that centers `extent` cells in `size`, clamped to the `i32` range
fn centered_offset(size: usize, extent: i32) -> i32 {
    let size = i64::try_from(size).unwrap_or(i64::MAX);
    let offset = (size - i64::from(extent)) / 2;
    offset.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Build the simulation, falling back to a random board when seeding fails
pub fn build_simulation(config: &SimulationConfig) -> Result<Simulation> {
    match Simulation::new(config.clone()) {
        Ok(simulation) => Ok(simulation),
        Err(err @ (Error::UnknownSeed { .. } | Error::OutOfBounds { .. })) => {
            warn!("Could not seed board: {}; falling back to a random board", err);
            let fallback = SimulationConfig {
                initial: InitialState::default(),
                ..config.clone()
            };
            Ok(Simulation::new(fallback)?)
        }
        Err(err) => Err(err.into()),
    }
}

/// Render and step once per frame until a stop condition or `shutdown` resolves
pub async fn run_loop<W, F>(
    simulation: &mut Simulation,
    config: &DriverConfig,
    out: &mut W,
    shutdown: F,
) -> Result<SimulationSummary>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut ticker = interval(Duration::from_millis(config.frame_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut last_report = None;

    let stop_reason = loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => break StopReason::Interrupted,
            _ = ticker.tick() => {
                // Snapshot first, then step; the frame never observes a half-applied generation
                if config.render {
                    let frame = render_screen(&simulation.snapshot(), last_report.as_ref());
                    out.write_all(frame.as_bytes())?;
                    out.flush()?;
                }

                if simulation.is_finished() {
                    break StopReason::GenerationLimit;
                }

                let report = simulation.step();
                last_report = Some(report);

                if report.population == 0 {
                    break StopReason::Extinct;
                }
                if simulation.is_cycling() {
                    break StopReason::Cycle;
                }
            }
        }
    };

    // Draw the generation that ended the run, with its step line
    if config.render && matches!(stop_reason, StopReason::Extinct | StopReason::Cycle) {
        let frame = render_screen(&simulation.snapshot(), last_report.as_ref());
        out.write_all(frame.as_bytes())?;
        out.flush()?;
    }

    let summary = simulation.summary(stop_reason);
    info!(
        generations = summary.generations,
        final_population = summary.final_population,
        stop_reason = ?summary.stop_reason,
        "Run ended"
    );
    Ok(summary)
}
