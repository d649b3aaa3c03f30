//! Tank engine binary for the Reeftank simulation.
//!
//! This is the main entry point that wires together the tick loop, the
//! starting population, console controls, and snapshot logging. It loads
//! configuration, initializes all subsystems, and runs the simulation loop
//! until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$REEFTANK_CONFIG` or `reeftank-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Seed the random number generator
//! 4. Build the tank and its starting school
//! 5. Create operator state from simulation bounds
//! 6. Start the Ctrl-C handler and the console command reader
//! 7. Run the simulation loop
//! 8. Log the result

mod commands;
mod error;
mod snapshot_logger;

use std::path::PathBuf;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use reeftank_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, SimulationConfig};
use reeftank_core::operator::OperatorState;
use reeftank_core::runner;
use reeftank_core::tick::SimulationState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::snapshot_logger::SnapshotLogger;

/// Application entry point for the tank engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so report the source after.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .try_init()
        .map_err(|e| EngineError::Logging {
            message: format!("{e}"),
        })?;

    info!("reeftank-engine starting");
    info!(
        source = %source,
        width = config.arena.width,
        height = config.arena.height,
        initial_prey = config.population.initial_prey,
        refuges = config.refuges.len(),
        "Configuration loaded"
    );

    // 3. Seed the random number generator.
    let rng = match config.simulation.seed {
        Some(seed) => {
            info!(seed, "Using configured seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    // 4. Build the tank.
    let tick_interval_ms = config.clock.tick_interval_ms;
    let snapshot_interval = config.logging.snapshot_interval_ticks;
    let bounds = config.simulation.clone();
    let mut sim_state = SimulationState::new(config, rng);
    info!(
        prey = sim_state.prey.len(),
        refuges = sim_state.environment.refuges().len(),
        "Tank populated"
    );

    // 5. Create operator state.
    let operator = Arc::new(OperatorState::new(tick_interval_ms, &bounds));
    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Operator state initialized"
    );

    // 6. Operator inputs: Ctrl-C and console commands.
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping after the current tick");
                    operator.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }
    tokio::spawn(commands::read_commands(
        commands::spawn_stdin_reader(),
        Arc::clone(&operator),
    ));
    info!("Console commands enabled: food, pause, resume, speed, stop");

    // 7. Run the simulation.
    let mut callback = SnapshotLogger::new(snapshot_interval);
    let result = runner::run_simulation(&mut sim_state, &operator, &mut callback).await?;

    // 8. Log results.
    runner::log_simulation_end(&result);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        snapshots = callback.emitted(),
        "reeftank-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// Reads the file named by `$REEFTANK_CONFIG`, falling back to
/// `reeftank-config.yaml` in the working directory. A missing default file
/// yields the stock tank; a missing file named explicitly is an error.
fn load_config() -> Result<(SimulationConfig, String), EngineError> {
    let explicit = std::env::var_os(CONFIG_PATH_ENV);
    let path = explicit
        .as_ref()
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if explicit.is_some() || path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        Ok((SimulationConfig::default(), "defaults".to_owned()))
    }
}
