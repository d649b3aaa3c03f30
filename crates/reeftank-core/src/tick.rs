//! Tick pipeline: one ordered pass over the whole tank.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the tick counter and simulated time.
//!
//! 2. **Environment** -- dissolve expired pellets and sample the ambient
//!    current for this tick.
//!
//! 3. **Prey** -- every non-dying prey, in id order, hides, feeds, or
//!    schools. Prey see the school and the predators as they were at the end
//!    of the previous tick; the only same-tick effect is that an eaten pellet
//!    is gone for later prey.
//!
//! 4. **Predators** -- the hunter pursues, the protector intervenes or
//!    patrols, competitors are pushed apart, and both drift with the current.
//!    Predators also target prey by their previous-tick positions.
//!
//! 5. **Predation** -- lifecycle transitions evaluated against the positions
//!    committed in phases 3 and 4.
//!
//! 6. **Prune** -- prey whose death animation has finished are dropped.
//!
//! The pass is deterministic given the same initial state and the same
//! random number stream.

use rand::Rng;
use rand::rngs::StdRng;
use reeftank_agents::predation::{self, Transition};
use reeftank_agents::{
    PredatorContext, PreyContext, PreyView, ProtectorAction, advance_predators, update_prey,
};
use reeftank_types::{
    Facing, PelletId, Point, PredatorEntity, PredatorKind, PreyColor, PreyEntity, PreyId,
    PreyState, Vector,
};
use reeftank_world::{Environment, WorldError};
use tracing::{debug, info};

use crate::clock::WorldClock;
use crate::config::SimulationConfig;

/// Fraction of the arena the initial population is scattered across.
const SPAWN_SPREAD: f64 = 0.8;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulated milliseconds elapsed at the end of the tick.
    pub elapsed_ms: u64,
    /// Prey still in the tank, dying ones included.
    pub prey_remaining: u32,
    /// Prey that are neither dying nor removed.
    pub prey_alive: u32,
    /// Prey the hunter seized this tick.
    pub seized: Vec<PreyId>,
    /// Prey the hunter released this tick (now dying).
    pub released: Vec<PreyId>,
    /// Prey removed after their death animation.
    pub removed: Vec<PreyId>,
    /// Pellets eaten this tick, in eating order.
    pub pellets_consumed: Vec<PelletId>,
    /// Pellets that dissolved this tick.
    pub pellets_expired: Vec<PelletId>,
    /// Prey the hunter swam towards.
    pub hunter_target: Option<PreyId>,
    /// What the protector did.
    pub protector: ProtectorAction,
}

impl TickSummary {
    /// Whether the protector threw the hunter clear this tick.
    pub fn hunter_repelled(&self) -> bool {
        self.protector == ProtectorAction::Repelled
    }
}

/// The mutable simulation state passed through the tick pipeline.
#[derive(Debug)]
pub struct SimulationState {
    /// The simulation clock.
    pub clock: WorldClock,
    /// Configuration the state was built from.
    pub config: SimulationConfig,
    /// Prey ordered by id, dying ones included.
    pub prey: Vec<PreyEntity>,
    /// The hunter (shark).
    pub hunter: PredatorEntity,
    /// The protector (whale shark).
    pub protector: PredatorEntity,
    /// Arena, pellets, refuges, and current.
    pub environment: Environment,
    /// Random stream for seeding and swimming noise.
    pub rng: StdRng,
}

impl SimulationState {
    /// Build a fresh tank from `config`.
    ///
    /// Prey are scattered over the top-left 80% of the arena with random
    /// colours and headings. The hunter starts in the centre facing right;
    /// the protector starts at 80% of the width and height facing left.
    pub fn new(config: SimulationConfig, mut rng: StdRng) -> Self {
        let arena = config.arena();
        let environment = Environment::new(arena, config.refuges.clone(), config.current)
            .with_default_pellet_size(config.food.default_size)
            .with_pellet_margin(config.prey.footprint);

        let prey = (0..config.population.initial_prey)
            .map(|i| seed_prey(PreyId(i), &config, &mut rng))
            .collect();

        let (hunter_at, _) = arena.clamp(arena.center(), config.predators.hunter_footprint);
        let hunter = PredatorEntity {
            kind: PredatorKind::Hunter,
            position: hunter_at,
            facing: Facing::Right,
            speed: config.predators.hunter_speed,
        };

        let (protector_at, _) = arena.clamp(
            Point::new(arena.width * SPAWN_SPREAD, arena.height * SPAWN_SPREAD),
            config.predators.protector_footprint,
        );
        let protector = PredatorEntity {
            kind: PredatorKind::Protector,
            position: protector_at,
            facing: Facing::Left,
            speed: config.predators.protector_speed,
        };

        info!(
            prey = config.population.initial_prey,
            width = arena.width,
            height = arena.height,
            refuges = config.refuges.len(),
            "Tank seeded"
        );

        Self {
            clock: WorldClock::new(),
            config,
            prey,
            hunter,
            protector,
            environment,
            rng,
        }
    }

    /// Drop a pellet into the tank at the current simulation time.
    ///
    /// `size` and `duration_ms` fall back to the `food` section defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] for a non-finite position or when pellet ids
    /// are exhausted.
    pub fn spawn_food_pellet(
        &mut self,
        position: Point,
        size: Option<f64>,
        duration_ms: Option<u64>,
    ) -> Result<PelletId, WorldError> {
        let duration_ms = duration_ms.unwrap_or(self.config.food.default_duration_ms);
        self.environment
            .spawn_pellet(position, size, duration_ms, self.clock.elapsed_ms())
    }

    /// Number of prey that are not dying.
    pub fn prey_alive(&self) -> usize {
        self.prey.iter().filter(|p| !p.is_dying()).count()
    }

    /// Look up a prey by id.
    pub fn prey_by_id(&self, id: PreyId) -> Option<&PreyEntity> {
        self.prey.iter().find(|p| p.id == id)
    }
}

fn seed_prey<R: Rng + ?Sized>(id: PreyId, config: &SimulationConfig, rng: &mut R) -> PreyEntity {
    let arena = config.arena();
    let base = config.prey.base_speed;
    let x = rng.random::<f64>() * arena.width * SPAWN_SPREAD;
    let y = rng.random::<f64>() * arena.height * SPAWN_SPREAD;
    let (position, _) = arena.clamp(Point::new(x, y), config.prey.footprint);

    let heading = if rng.random_bool(0.5) {
        Facing::Left
    } else {
        Facing::Right
    };
    let velocity = Vector::new(
        rng.random::<f64>().mul_add(base, base) * heading.sign(),
        (rng.random::<f64>() - 0.5) * base,
    );
    let color_index = rng.random_range(0..PreyColor::ALL.len());
    let color = PreyColor::ALL
        .get(color_index)
        .copied()
        .unwrap_or(PreyColor::Coral);

    PreyEntity {
        id,
        position,
        velocity,
        facing: heading,
        color,
        state: PreyState::default(),
    }
}

/// Execute a single tick covering `dt_ms` simulated milliseconds.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the clock cannot advance. The state is
/// untouched in that case.
pub fn run_tick(state: &mut SimulationState, dt_ms: u64) -> Result<TickSummary, TickError> {
    // --- Clock ---
    let tick = state.clock.advance(dt_ms)?;
    let now_ms = state.clock.elapsed_ms();

    // --- Environment ---
    let pellets_expired = state.environment.prune_expired(now_ms);
    let current = state.environment.current_offset(now_ms);

    // --- Previous-tick views ---
    let school: Vec<PreyView> = state
        .prey
        .iter()
        .filter(|p| !p.is_dying())
        .map(PreyView::from)
        .collect();

    // --- Prey ---
    let prey_ctx = PreyContext {
        hunter: state.hunter.position,
        protector: state.protector.position,
        school: &school,
        current,
    };
    let mut pellets_consumed = Vec::new();
    for prey in &mut state.prey {
        let outcome = update_prey(
            prey,
            &prey_ctx,
            &mut state.environment,
            &state.config.prey,
            &mut state.rng,
        );
        if let Some(pellet) = outcome.consumed {
            debug!(tick, prey = %prey.id, %pellet, "Prey fed");
            pellets_consumed.push(pellet);
        }
    }

    // --- Predators ---
    let predator_ctx = PredatorContext {
        prey: &school,
        now_ms,
        current,
        arena: state.environment.arena(),
    };
    let predators = advance_predators(
        &mut state.hunter,
        &mut state.protector,
        &predator_ctx,
        &state.config.predators,
    );
    if predators.protector == ProtectorAction::Repelled {
        info!(
            tick,
            x = state.hunter.position.x,
            y = state.hunter.position.y,
            "Protector repelled the hunter"
        );
    }

    // --- Predation ---
    let mut seized = Vec::new();
    let mut released = Vec::new();
    let mut removed = Vec::new();
    for prey in &mut state.prey {
        match predation::evaluate(prey, &state.hunter, now_ms, &state.config.predation) {
            Transition::None => {}
            Transition::Seized => {
                info!(tick, prey = %prey.id, "Prey seized");
                seized.push(prey.id);
            }
            Transition::Released => {
                info!(tick, prey = %prey.id, "Prey released, dying");
                released.push(prey.id);
            }
            Transition::Removed => {
                info!(tick, prey = %prey.id, "Prey removed");
                removed.push(prey.id);
            }
        }
    }

    // --- Prune ---
    if !removed.is_empty() {
        state.prey.retain(|p| !removed.contains(&p.id));
    }

    let prey_remaining = u32::try_from(state.prey.len()).unwrap_or(u32::MAX);
    let prey_alive = u32::try_from(state.prey_alive()).unwrap_or(u32::MAX);

    debug!(
        tick,
        now_ms,
        prey_remaining,
        prey_alive,
        pellets = state.environment.pellets().len(),
        protector = ?predators.protector,
        "Tick completed"
    );

    Ok(TickSummary {
        tick,
        elapsed_ms: now_ms,
        prey_remaining,
        prey_alive,
        seized,
        released,
        removed,
        pellets_consumed,
        pellets_expired,
        hunter_target: predators.hunter_target,
        protector: predators.protector,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn state_with(prey: u32) -> SimulationState {
        let mut config = SimulationConfig::default();
        config.population.initial_prey = prey;
        SimulationState::new(config, StdRng::seed_from_u64(42))
    }

    #[test]
    fn seeding_matches_population_config() {
        let state = state_with(10);
        assert_eq!(state.prey.len(), 10);
        let arena = state.environment.arena();
        for (i, prey) in state.prey.iter().enumerate() {
            assert_eq!(prey.id, PreyId(u32::try_from(i).unwrap()));
            assert!(prey.position.x <= arena.width * SPAWN_SPREAD);
            assert!(prey.position.y <= arena.height * SPAWN_SPREAD);
            let speed_x = prey.velocity.dx.abs();
            assert!((0.5..=1.0).contains(&speed_x));
            assert!(prey.velocity.dy.abs() <= 0.25);
            assert_eq!(prey.facing.sign(), prey.velocity.dx.signum());
        }
    }

    #[test]
    fn predators_start_in_place() {
        let state = state_with(0);
        assert_eq!(state.hunter.position, Point::new(500.0, 400.0));
        assert_eq!(state.hunter.facing, Facing::Right);
        assert_eq!(state.protector.position, Point::new(800.0, 640.0));
        assert_eq!(state.protector.facing, Facing::Left);
    }

    #[test]
    fn tick_advances_clock() {
        let mut state = state_with(3);
        let summary = run_tick(&mut state, 50).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.elapsed_ms, 50);
        let summary = run_tick(&mut state, 50).unwrap();
        assert_eq!(summary.tick, 2);
        assert_eq!(state.clock.elapsed_ms(), 100);
    }

    #[test]
    fn clock_overflow_aborts_tick() {
        let mut state = state_with(3);
        state.clock = WorldClock::from_parts(1, u64::MAX);
        let before = state.prey.clone();
        assert!(run_tick(&mut state, 1).is_err());
        assert_eq!(state.prey, before);
    }

    #[test]
    fn empty_tank_protector_patrols() {
        let mut state = state_with(0);
        let summary = run_tick(&mut state, 50).unwrap();
        assert_eq!(summary.protector, ProtectorAction::Patrolling);
        assert_eq!(summary.hunter_target, None);
        assert_eq!(summary.prey_remaining, 0);
    }

    #[test]
    fn spawned_pellet_uses_food_defaults() {
        let mut state = state_with(0);
        run_tick(&mut state, 50).unwrap();
        let id = state
            .spawn_food_pellet(Point::new(100.0, 100.0), None, None)
            .unwrap();
        let pellet = state
            .environment
            .pellets()
            .iter()
            .find(|p| p.id == id)
            .unwrap();
        assert_eq!(pellet.expires_at_ms, 50 + 10_000);
        assert!((pellet.size - 16.0).abs() < 1e-12);
    }

    #[test]
    fn expired_pellets_are_reported() {
        let mut state = state_with(0);
        state
            .spawn_food_pellet(Point::new(100.0, 100.0), None, Some(100))
            .unwrap();
        assert!(run_tick(&mut state, 50).unwrap().pellets_expired.is_empty());
        assert_eq!(run_tick(&mut state, 50).unwrap().pellets_expired.len(), 1);
        assert!(state.environment.pellets().is_empty());
    }
}
