//! Food pellet bookkeeping.
//!
//! Pellets are held in spawn order. A pellet leaves the store either when it
//! expires or when a prey claims it, and a claimed pellet is gone before any
//! later prey in the same tick looks for food.

use reeftank_types::{FoodPellet, PelletId, Point};

use crate::error::WorldError;
use crate::spatial;

/// The set of uneaten pellets in the tank.
#[derive(Debug, Clone)]
pub struct PelletStore {
    pellets: Vec<FoodPellet>,
    next_id: PelletId,
}

impl Default for PelletStore {
    fn default() -> Self {
        Self {
            pellets: Vec::new(),
            next_id: PelletId(0),
        }
    }
}

impl PelletStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pellet that dissolves `duration_ms` after `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PelletIdsExhausted`] if no identifiers remain.
    pub fn spawn(
        &mut self,
        position: Point,
        size: f64,
        duration_ms: u64,
        now_ms: u64,
    ) -> Result<PelletId, WorldError> {
        let id = self.next_id;
        self.next_id = id.next().ok_or(WorldError::PelletIdsExhausted)?;
        self.pellets.push(FoodPellet {
            id,
            position,
            size,
            expires_at_ms: now_ms.saturating_add(duration_ms),
        });
        Ok(id)
    }

    /// Remove every pellet whose expiry time has been reached.
    ///
    /// Returns the identifiers of the removed pellets in spawn order.
    pub fn prune_expired(&mut self, now_ms: u64) -> Vec<PelletId> {
        let mut expired = Vec::new();
        self.pellets.retain(|p| {
            if p.is_expired(now_ms) {
                expired.push(p.id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Remove and return the pellet with `id`, if it is still present.
    pub fn claim(&mut self, id: PelletId) -> Option<FoodPellet> {
        let index = self.pellets.iter().position(|p| p.id == id)?;
        Some(self.pellets.remove(index))
    }

    /// The pellet closest to `origin`.
    pub fn nearest(&self, origin: Point) -> Option<&FoodPellet> {
        spatial::nearest_by(origin, &self.pellets, |p| p.position)
    }

    /// Pellets in spawn order.
    pub fn as_slice(&self) -> &[FoodPellet] {
        &self.pellets
    }

    /// Number of pellets in the store.
    pub fn len(&self) -> usize {
        self.pellets.len()
    }

    /// Whether the store holds no pellets.
    pub fn is_empty(&self) -> bool {
        self.pellets.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_assigned_in_spawn_order() {
        let mut store = PelletStore::new();
        let a = store.spawn(Point::new(1.0, 1.0), 16.0, 100, 0).unwrap();
        let b = store.spawn(Point::new(2.0, 2.0), 16.0, 100, 0).unwrap();
        assert_eq!(a, PelletId(0));
        assert_eq!(b, PelletId(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn expiry_removes_only_due_pellets() {
        let mut store = PelletStore::new();
        store.spawn(Point::new(1.0, 1.0), 16.0, 100, 0).unwrap();
        let keep = store.spawn(Point::new(2.0, 2.0), 16.0, 500, 0).unwrap();
        let expired = store.prune_expired(100);
        assert_eq!(expired, vec![PelletId(0)]);
        assert_eq!(store.as_slice().len(), 1);
        assert_eq!(store.as_slice()[0].id, keep);
    }

    #[test]
    fn claim_is_exclusive() {
        let mut store = PelletStore::new();
        let id = store.spawn(Point::new(1.0, 1.0), 16.0, 100, 0).unwrap();
        assert!(store.claim(id).is_some());
        assert!(store.claim(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn nearest_pellet_is_found() {
        let mut store = PelletStore::new();
        store.spawn(Point::new(100.0, 100.0), 16.0, 100, 0).unwrap();
        let close = store.spawn(Point::new(5.0, 5.0), 16.0, 100, 0).unwrap();
        let found = store.nearest(Point::new(0.0, 0.0)).map(|p| p.id);
        assert_eq!(found, Some(close));
    }

    #[test]
    fn huge_duration_saturates() {
        let mut store = PelletStore::new();
        store.spawn(Point::new(1.0, 1.0), 16.0, u64::MAX, 10).unwrap();
        assert_eq!(store.as_slice()[0].expires_at_ms, u64::MAX);
    }
}
