//! Configuration loading and typed config structures for the Reeftank simulation.
//!
//! The canonical configuration lives in `reeftank-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file. Every
//! section is optional; an empty file yields the stock tank.

use std::path::Path;

use reeftank_agents::{PredationConfig, PredatorConfig, PreyConfig};
use reeftank_types::{Arena, Point};
use reeftank_world::AmbientCurrent;
use serde::Deserialize;

/// Environment variable naming the configuration file to load.
pub const CONFIG_PATH_ENV: &str = "REEFTANK_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "reeftank-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible tank.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `reeftank-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Tank dimensions.
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Tick pacing.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Initial population.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Prey tuning.
    #[serde(default)]
    pub prey: PreyConfig,

    /// Hunter and protector tuning.
    #[serde(default)]
    pub predators: PredatorConfig,

    /// Attack and death-animation tuning.
    #[serde(default)]
    pub predation: PredationConfig,

    /// Ambient current.
    #[serde(default)]
    pub current: AmbientCurrent,

    /// Food pellet defaults.
    #[serde(default)]
    pub food: FoodConfig,

    /// Safe-haven points prey flee towards.
    #[serde(default = "default_refuges")]
    pub refuges: Vec<Point>,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            clock: ClockConfig::default(),
            population: PopulationConfig::default(),
            prey: PreyConfig::default(),
            predators: PredatorConfig::default(),
            predation: PredationConfig::default(),
            current: AmbientCurrent::default(),
            food: FoodConfig::default(),
            refuges: default_refuges(),
            simulation: SimulationBoundsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// The arena described by the `arena` section.
    pub const fn arena(&self) -> Arena {
        Arena::new(self.arena.width, self.arena.height)
    }

    /// Reject configurations that cannot produce a working tank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        if self.clock.step_ms == 0 {
            return Err(invalid("clock.step_ms must be at least 1"));
        }

        let prey = &self.prey;
        for (name, value) in [
            ("prey.base_speed", prey.base_speed),
            ("prey.neighbor_radius", prey.neighbor_radius),
            ("prey.separation_distance", prey.separation_distance),
            ("prey.separation_weight", prey.separation_weight),
            ("prey.alignment_blend", prey.alignment_blend),
            ("prey.jitter", prey.jitter),
            ("prey.danger_distance", prey.danger_distance),
            ("prey.flee_multiplier", prey.flee_multiplier),
            ("prey.feed_multiplier", prey.feed_multiplier),
            ("prey.consumption_distance", prey.consumption_distance),
            ("prey.chase_radius", prey.chase_radius),
            ("prey.max_chase_multiplier", prey.max_chase_multiplier),
            ("prey.footprint", prey.footprint),
        ] {
            non_negative(name, value)?;
        }

        let predators = &self.predators;
        for (name, value) in [
            ("predators.hunter_speed", predators.hunter_speed),
            ("predators.hunter_footprint", predators.hunter_footprint),
            ("predators.protector_speed", predators.protector_speed),
            ("predators.protector_footprint", predators.protector_footprint),
            ("predators.guard_prey_radius", predators.guard_prey_radius),
            ("predators.guard_hunter_radius", predators.guard_hunter_radius),
            ("predators.repel_distance", predators.repel_distance),
            ("predators.patrol_step", predators.patrol_step),
            ("predators.patrol_period_x_ms", predators.patrol_period_x_ms),
            ("predators.patrol_period_y_ms", predators.patrol_period_y_ms),
            ("predators.competition_distance", predators.competition_distance),
            ("predators.competition_nudge", predators.competition_nudge),
        ] {
            non_negative(name, value)?;
        }

        non_negative("predation.attack_range", self.predation.attack_range)?;

        for (name, value) in [
            ("current.amplitude_x", self.current.amplitude_x),
            ("current.amplitude_y", self.current.amplitude_y),
            ("current.period_x_ms", self.current.period_x_ms),
            ("current.period_y_ms", self.current.period_y_ms),
        ] {
            if !value.is_finite() {
                return Err(invalid(&format!("{name} must be finite, got {value}")));
            }
        }

        positive("food.default_size", self.food.default_size)?;

        if let Some(refuge) = self.refuges.iter().find(|r| !r.is_finite()) {
            return Err(invalid(&format!(
                "refuge ({}, {}) is not a finite point",
                refuge.x, refuge.y
            )));
        }
        Ok(())
    }
}

/// Tank dimensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArenaConfig {
    /// Horizontal extent.
    #[serde(default = "default_arena_width")]
    pub width: f64,

    /// Vertical extent.
    #[serde(default = "default_arena_height")]
    pub height: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: default_arena_width(),
            height: default_arena_height(),
        }
    }
}

/// Tick pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Simulated milliseconds each tick covers.
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            step_ms: default_step_ms(),
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of prey seeded at simulation start.
    #[serde(default = "default_initial_prey")]
    pub initial_prey: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_prey: default_initial_prey(),
        }
    }
}

/// Food pellet defaults for spawn requests that omit them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FoodConfig {
    /// Pellet diameter.
    #[serde(default = "default_pellet_size")]
    pub default_size: f64,

    /// Pellet lifetime in simulated milliseconds.
    #[serde(default = "default_pellet_duration_ms")]
    pub default_duration_ms: u64,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            default_size: default_pellet_size(),
            default_duration_ms: default_pellet_duration_ms(),
        }
    }
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many wall-clock seconds (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,

    /// Stop once every prey has been removed.
    #[serde(default)]
    pub stop_on_extinction: bool,

    /// Seed for the random number generator. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            max_real_time_seconds: 0,
            stop_on_extinction: false,
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit a full snapshot every this many ticks (0 = never).
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
        }
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

const fn default_arena_width() -> f64 {
    1000.0
}

const fn default_arena_height() -> f64 {
    800.0
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_step_ms() -> u64 {
    50
}

const fn default_initial_prey() -> u32 {
    10
}

const fn default_pellet_size() -> f64 {
    16.0
}

const fn default_pellet_duration_ms() -> u64 {
    10_000
}

fn default_refuges() -> Vec<Point> {
    vec![
        Point::new(80.0, 700.0),
        Point::new(500.0, 720.0),
        Point::new(900.0, 700.0),
    ]
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_snapshot_interval_ticks() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.initial_prey, 10);
        assert_eq!(config.clock.tick_interval_ms, 50);
        assert_eq!(config.refuges.len(), 3);
        assert_eq!(config.predation.death_animation_ms, 1000);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
arena:
  width: 640
  height: 480

clock:
  tick_interval_ms: 20
  step_ms: 16

population:
  initial_prey: 4

prey:
  base_speed: 0.8
  danger_distance: 90

predators:
  hunter_speed: 2.5
  repel_distance: 200

predation:
  attack_range: 25
  death_animation_ms: 500

current:
  amplitude_x: 0.0
  amplitude_y: 0.0

food:
  default_size: 12
  default_duration_ms: 4000

refuges:
  - { x: 10, y: 400 }

simulation:
  max_ticks: 500
  stop_on_extinction: true
  seed: 99

logging:
  level: debug
  snapshot_interval_ticks: 10
";

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert!((config.arena.width - 640.0).abs() < 1e-12);
        assert_eq!(config.clock.step_ms, 16);
        assert_eq!(config.population.initial_prey, 4);
        assert!((config.prey.base_speed - 0.8).abs() < 1e-12);
        assert!((config.prey.jitter - 0.05).abs() < 1e-12);
        assert!((config.predators.hunter_speed - 2.5).abs() < 1e-12);
        assert_eq!(config.predation.death_animation_ms, 500);
        assert_eq!(config.refuges, vec![Point::new(10.0, 400.0)]);
        assert_eq!(config.simulation.seed, Some(99));
        assert!(config.simulation.stop_on_extinction);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("population:\n  initial_prey: 3\n");
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.population.initial_prey, 3);
        assert!((config.arena.height - 800.0).abs() < 1e-12);
        assert_eq!(config.refuges.len(), 3);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn empty_refuge_list_is_allowed() {
        let config = SimulationConfig::parse("refuges: []\n").ok().unwrap_or_default();
        assert!(config.refuges.is_empty());
    }

    #[test]
    fn rejects_non_positive_arena() {
        let result = SimulationConfig::parse("arena:\n  width: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_zero_step() {
        let result = SimulationConfig::parse("clock:\n  step_ms: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_negative_tuning() {
        let result = SimulationConfig::parse("prey:\n  jitter: -1\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = SimulationConfig::parse("arena: [1, 2");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_PATH);
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert_eq!(config.ok(), Some(SimulationConfig::default()));
        }
    }
}
