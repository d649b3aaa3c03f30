//! Read-only world export consumed by the rendering layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::arena::Arena;
use crate::entities::{FoodPellet, PredatorEntity, PreyEntity};
use crate::geometry::Point;

/// Owned copy of the committed state after a tick.
///
/// The renderer reads one of these per animation frame. Because it is an
/// owned value, nothing the renderer does can reach back into the live
/// simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Number of ticks completed.
    pub tick: u64,
    /// Simulated milliseconds elapsed since start.
    pub elapsed_ms: u64,
    /// Tank dimensions.
    pub arena: Arena,
    /// Live prey, including dying ones, ordered by id.
    pub prey: Vec<PreyEntity>,
    /// Hunter first, then protector.
    pub predators: Vec<PredatorEntity>,
    /// Uneaten, unexpired pellets in spawn order.
    pub pellets: Vec<FoodPellet>,
    /// Fixed safe-haven points.
    pub refuges: Vec<Point>,
}
