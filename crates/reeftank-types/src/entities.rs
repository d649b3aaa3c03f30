//! Entity structs for the tank: prey, predators, and food pellets.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::{Facing, Point, Vector};
use crate::ids::{PelletId, PreyId};

// ---------------------------------------------------------------------------
// Prey
// ---------------------------------------------------------------------------

/// Cosmetic body colour of a prey entity, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PreyColor {
    /// `#FF6B6B`
    Coral,
    /// `#4ECDC4`
    Turquoise,
    /// `#45B7D1`
    Sky,
    /// `#96CEB4`
    Sage,
    /// `#FFEEAD`
    Cream,
}

impl PreyColor {
    /// The full palette, in a stable order.
    pub const ALL: [Self; 5] = [
        Self::Coral,
        Self::Turquoise,
        Self::Sky,
        Self::Sage,
        Self::Cream,
    ];
}

/// Lifecycle state of a prey entity.
///
/// `Removed` is not a variant: a removed prey is simply absent from the
/// live collection. Hiding is only meaningful while the prey can still
/// move, so it is carried by the two non-dying variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PreyState {
    /// Swimming freely.
    Alive {
        /// Fleeing towards a refuge this tick.
        hiding: bool,
    },
    /// A hunter is in attack range and facing the prey.
    BeingEaten {
        /// Fleeing towards a refuge this tick.
        hiding: bool,
    },
    /// Released by the hunter; frozen while the death animation plays.
    Dying {
        /// Simulation time at which the prey started dying.
        since_ms: u64,
    },
}

impl Default for PreyState {
    fn default() -> Self {
        Self::Alive { hiding: false }
    }
}

/// A schooling fish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PreyEntity {
    /// Stable identity.
    pub id: PreyId,
    /// Top-left corner of the sprite.
    pub position: Point,
    /// Normalised swimming velocity carried into the next tick.
    pub velocity: Vector,
    /// Sprite orientation.
    pub facing: Facing,
    /// Body colour.
    pub color: PreyColor,
    /// Lifecycle state.
    pub state: PreyState,
}

impl PreyEntity {
    /// Whether the prey is playing its death animation.
    pub const fn is_dying(&self) -> bool {
        matches!(self.state, PreyState::Dying { .. })
    }

    /// Whether a hunter currently has hold of the prey.
    pub const fn is_being_eaten(&self) -> bool {
        matches!(self.state, PreyState::BeingEaten { .. })
    }

    /// Whether the prey is fleeing towards a refuge.
    pub const fn is_hiding(&self) -> bool {
        match self.state {
            PreyState::Alive { hiding } | PreyState::BeingEaten { hiding } => hiding,
            PreyState::Dying { .. } => false,
        }
    }

    /// Set the hiding flag. Has no effect on a dying prey.
    pub const fn set_hiding(&mut self, value: bool) {
        match &mut self.state {
            PreyState::Alive { hiding } | PreyState::BeingEaten { hiding } => *hiding = value,
            PreyState::Dying { .. } => {}
        }
    }

    /// When the prey started dying, if it is dying.
    pub const fn dying_since(&self) -> Option<u64> {
        match self.state {
            PreyState::Dying { since_ms } => Some(since_ms),
            PreyState::Alive { .. } | PreyState::BeingEaten { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Predators
// ---------------------------------------------------------------------------

/// The two predator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PredatorKind {
    /// Pursues the nearest prey (the shark).
    Hunter,
    /// Drives the hunter away from prey (the whale shark).
    Protector,
}

/// A predator. Predators never die.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PredatorEntity {
    /// Which behaviour drives this predator.
    pub kind: PredatorKind,
    /// Top-left corner of the sprite.
    pub position: Point,
    /// Sprite orientation; also the direction the hunter can bite in.
    pub facing: Facing,
    /// Distance covered per tick while moving.
    pub speed: f64,
}

// ---------------------------------------------------------------------------
// Food
// ---------------------------------------------------------------------------

/// A food pellet dropped into the tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FoodPellet {
    /// Identity, unique for the lifetime of the simulation.
    pub id: PelletId,
    /// Centre of the pellet.
    pub position: Point,
    /// Rendered diameter.
    pub size: f64,
    /// Simulation time at which the pellet dissolves.
    pub expires_at_ms: u64,
}

impl FoodPellet {
    /// Whether the pellet has dissolved at simulation time `now_ms`.
    pub const fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}
