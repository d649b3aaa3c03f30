//! Tuning parameters for prey, predators, and predation.
//!
//! These structs correspond to the `prey`, `predators`, and `predation`
//! sections of `reeftank-config.yaml`. Every field has a default so a
//! section may be omitted or only partially overridden.

use serde::Deserialize;

/// Prey movement and sensing parameters.
///
/// Speeds are in arena units per tick and distances in arena units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreyConfig {
    /// Cruising speed (default: 0.5).
    pub base_speed: f64,

    /// Radius within which other prey count as school neighbours (default: 100).
    pub neighbor_radius: f64,

    /// Neighbours closer than this push each other apart (default: 30).
    pub separation_distance: f64,

    /// Scale applied to the inverse-square separation push (default: 1.0).
    pub separation_weight: f64,

    /// Fraction of the gap to the neighbours' mean velocity closed per tick
    /// (default: 0.1).
    pub alignment_blend: f64,

    /// Half-width of the uniform per-axis velocity noise (default: 0.05).
    pub jitter: f64,

    /// A predator closer than this triggers hiding (default: 120).
    pub danger_distance: f64,

    /// Speed multiplier while fleeing (default: 2.0).
    pub flee_multiplier: f64,

    /// Speed multiplier while heading for food (default: 1.5).
    pub feed_multiplier: f64,

    /// A pellet closer than this after moving is eaten (default: 20).
    pub consumption_distance: f64,

    /// Hunter distance below which the prey speeds up (default: 200).
    pub chase_radius: f64,

    /// Speed multiplier reached when the hunter is on top of the prey, and
    /// the cap on a schooling displacement (default: 1.5).
    pub max_chase_multiplier: f64,

    /// Sprite width used for arena clamping (default: 40).
    pub footprint: f64,
}

impl Default for PreyConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.5,
            neighbor_radius: 100.0,
            separation_distance: 30.0,
            separation_weight: 1.0,
            alignment_blend: 0.1,
            jitter: 0.05,
            danger_distance: 120.0,
            flee_multiplier: 2.0,
            feed_multiplier: 1.5,
            consumption_distance: 20.0,
            chase_radius: 200.0,
            max_chase_multiplier: 1.5,
            footprint: 40.0,
        }
    }
}

/// Hunter and protector parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    /// Hunter distance per tick (default: 3).
    pub hunter_speed: f64,

    /// Hunter sprite width (default: 60).
    pub hunter_footprint: f64,

    /// Protector distance per tick (default: 4).
    pub protector_speed: f64,

    /// Protector sprite width (default: 80).
    pub protector_footprint: f64,

    /// The protector reacts when the hunter is this close to any prey
    /// (default: 150).
    pub guard_prey_radius: f64,

    /// The protector can repel the hunter from this close (default: 100).
    pub guard_hunter_radius: f64,

    /// How far a repelled hunter is thrown (default: 250).
    pub repel_distance: f64,

    /// Patrol displacement amplitude per axis (default: 2).
    pub patrol_step: f64,

    /// Horizontal patrol period divisor in milliseconds (default: 2000).
    pub patrol_period_x_ms: f64,

    /// Vertical patrol period divisor in milliseconds (default: 1500).
    pub patrol_period_y_ms: f64,

    /// Predators closer than this push each other apart (default: 50).
    pub competition_distance: f64,

    /// Fraction of its own speed each predator is pushed by (default: 0.5).
    pub competition_nudge: f64,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            hunter_speed: 3.0,
            hunter_footprint: 60.0,
            protector_speed: 4.0,
            protector_footprint: 80.0,
            guard_prey_radius: 150.0,
            guard_hunter_radius: 100.0,
            repel_distance: 250.0,
            patrol_step: 2.0,
            patrol_period_x_ms: 2000.0,
            patrol_period_y_ms: 1500.0,
            competition_distance: 50.0,
            competition_nudge: 0.5,
        }
    }
}

/// Attack and death-animation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PredationConfig {
    /// The hunter seizes prey closer than this (default: 30).
    pub attack_range: f64,

    /// How long a released prey plays its death animation (default: 1000).
    pub death_animation_ms: u64,
}

impl Default for PredationConfig {
    fn default() -> Self {
        Self {
            attack_range: 30.0,
            death_animation_ms: 1000,
        }
    }
}
