//! Read-only export of the committed tank state.

use reeftank_types::WorldSnapshot;

use crate::tick::SimulationState;

/// Copy the current state into an owned [`WorldSnapshot`].
pub fn take(state: &SimulationState) -> WorldSnapshot {
    WorldSnapshot {
        tick: state.clock.tick(),
        elapsed_ms: state.clock.elapsed_ms(),
        arena: state.environment.arena(),
        prey: state.prey.clone(),
        predators: vec![state.hunter.clone(), state.protector.clone()],
        pellets: state.environment.pellets().to_vec(),
        refuges: state.environment.refuges().to_vec(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use reeftank_types::{Point, PredatorKind};

    use super::*;
    use crate::config::SimulationConfig;
    use crate::tick::run_tick;

    #[test]
    fn snapshot_reflects_state_and_is_detached() {
        let mut state = SimulationState::new(SimulationConfig::default(), StdRng::seed_from_u64(1));
        state
            .spawn_food_pellet(Point::new(10.0, 10.0), None, None)
            .unwrap();
        run_tick(&mut state, 50).unwrap();

        let snap = take(&state);
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.elapsed_ms, 50);
        assert_eq!(snap.prey.len(), state.prey.len());
        assert_eq!(snap.predators.len(), 2);
        assert_eq!(snap.predators[0].kind, PredatorKind::Hunter);
        assert_eq!(snap.predators[1].kind, PredatorKind::Protector);
        assert_eq!(snap.refuges.len(), 3);

        let frozen = snap.clone();
        run_tick(&mut state, 50).unwrap();
        assert_eq!(snap, frozen);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let state = SimulationState::new(SimulationConfig::default(), StdRng::seed_from_u64(2));
        let json = serde_json::to_value(take(&state)).unwrap();
        assert_eq!(json["prey"].as_array().map(Vec::len), Some(10));
        assert_eq!(json["prey"][0]["state"]["state"], "alive");
    }
}
