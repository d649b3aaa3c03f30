//! The tank environment that surrounds the animals.
//!
//! [`Environment`] owns everything in the tank that is not a fish: the
//! arena bounds, uneaten food, fixed refuges, and the ambient current. The
//! tick pipeline reads it while computing behaviour and mutates it only to
//! spawn, claim, and expire pellets.

use reeftank_types::{Arena, FoodPellet, PelletId, Point, Vector};
use tracing::debug;

use crate::current::AmbientCurrent;
use crate::error::WorldError;
use crate::food::PelletStore;
use crate::spatial;

/// Diameter used when a pellet is requested without a usable size.
pub const DEFAULT_PELLET_SIZE: f64 = 16.0;

/// Arena bounds plus pellets, refuges, and the ambient current.
#[derive(Debug, Clone)]
pub struct Environment {
    arena: Arena,
    pellets: PelletStore,
    refuges: Vec<Point>,
    current: AmbientCurrent,
    default_pellet_size: f64,
    pellet_margin: f64,
}

impl Environment {
    /// Create an environment with no pellets.
    pub fn new(arena: Arena, refuges: Vec<Point>, current: AmbientCurrent) -> Self {
        Self {
            arena,
            pellets: PelletStore::new(),
            refuges,
            current,
            default_pellet_size: DEFAULT_PELLET_SIZE,
            pellet_margin: 0.0,
        }
    }

    /// Override the size used for pellets requested without a valid size.
    #[must_use]
    pub const fn with_default_pellet_size(mut self, size: f64) -> Self {
        self.default_pellet_size = size;
        self
    }

    /// Keep pellets this far from the right and bottom walls.
    ///
    /// Prey positions are sprite corners clamped by their footprint, so a
    /// margin equal to that footprint keeps every pellet reachable.
    #[must_use]
    pub const fn with_pellet_margin(mut self, margin: f64) -> Self {
        self.pellet_margin = margin;
        self
    }

    /// Drop a pellet into the tank.
    ///
    /// The position is clamped into the arena less the pellet margin. A
    /// non-positive or non-finite `size` falls back to the default pellet
    /// size.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidPelletPosition`] for a non-finite
    /// position and [`WorldError::PelletIdsExhausted`] if no identifiers
    /// remain.
    pub fn spawn_pellet(
        &mut self,
        position: Point,
        size: Option<f64>,
        duration_ms: u64,
        now_ms: u64,
    ) -> Result<PelletId, WorldError> {
        if !position.is_finite() {
            return Err(WorldError::InvalidPelletPosition {
                x: position.x,
                y: position.y,
            });
        }
        let size = size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(self.default_pellet_size);
        let (position, _) = self.arena.clamp(position, self.pellet_margin);
        let id = self.pellets.spawn(position, size, duration_ms, now_ms)?;
        debug!(
            pellet = %id,
            x = position.x,
            y = position.y,
            size,
            expires_at_ms = now_ms.saturating_add(duration_ms),
            "Food pellet spawned"
        );
        Ok(id)
    }

    /// Remove pellets whose lifetime has run out at `now_ms`.
    pub fn prune_expired(&mut self, now_ms: u64) -> Vec<PelletId> {
        let expired = self.pellets.prune_expired(now_ms);
        for id in &expired {
            debug!(pellet = %id, now_ms, "Food pellet dissolved");
        }
        expired
    }

    /// Consume the pellet with `id`. Returns `None` if it is already gone.
    pub fn claim_pellet(&mut self, id: PelletId) -> Option<FoodPellet> {
        let pellet = self.pellets.claim(id)?;
        debug!(pellet = %id, "Food pellet eaten");
        Some(pellet)
    }

    /// The uneaten pellet closest to `origin`.
    pub fn nearest_pellet(&self, origin: Point) -> Option<&FoodPellet> {
        self.pellets.nearest(origin)
    }

    /// The refuge closest to `origin`.
    pub fn nearest_refuge(&self, origin: Point) -> Option<Point> {
        spatial::nearest(origin, &self.refuges)
    }

    /// Ambient current offset to apply during the tick ending at `now_ms`.
    pub fn current_offset(&self, now_ms: u64) -> Vector {
        self.current.offset_at(now_ms)
    }

    /// Uneaten pellets in spawn order.
    pub fn pellets(&self) -> &[FoodPellet] {
        self.pellets.as_slice()
    }

    /// Fixed refuge points.
    pub fn refuges(&self) -> &[Point] {
        &self.refuges
    }

    /// Tank bounds.
    pub const fn arena(&self) -> Arena {
        self.arena
    }
}
