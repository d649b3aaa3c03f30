//! Per-tick prey behaviour: hiding, feeding, and schooling.
//!
//! Each prey reads the previous tick's committed positions of the school and
//! the predators, picks one mode for the tick, and writes only its own
//! entity. The one exception is food: a prey that reaches a pellet claims it
//! from the [`Environment`] immediately, so later prey in the same pass
//! cannot eat it too.
//!
//! Mode priority is strict:
//!
//! 1. **Flee** when either predator is within the danger distance. The prey
//!    heads for the nearest refuge (or directly away from the threat when the
//!    tank has none) and is marked as hiding.
//! 2. **Feed** when a pellet exists. The prey heads for the nearest one.
//! 3. **School** otherwise: velocity blends towards the neighbours' mean and
//!    is pushed away from neighbours that are too close.
//!
//! Every mode adds a little uniform noise, and the ambient current is added
//! to the position after the displacement is capped.

use rand::Rng;
use reeftank_types::{EPSILON, Facing, PelletId, Point, PreyEntity, PreyId, Vector};
use reeftank_world::Environment;
use reeftank_world::spatial;

use crate::config::PreyConfig;

/// What one prey looked like at the end of the previous tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreyView {
    /// Which prey this is.
    pub id: PreyId,
    /// Committed position.
    pub position: Point,
    /// Committed velocity.
    pub velocity: Vector,
}

impl From<&PreyEntity> for PreyView {
    fn from(prey: &PreyEntity) -> Self {
        Self {
            id: prey.id,
            position: prey.position,
            velocity: prey.velocity,
        }
    }
}

/// Read-only inputs shared by every prey update in a tick.
#[derive(Debug, Clone, Copy)]
pub struct PreyContext<'a> {
    /// Hunter position at the end of the previous tick.
    pub hunter: Point,
    /// Protector position at the end of the previous tick.
    pub protector: Point,
    /// Non-dying prey as of the end of the previous tick.
    pub school: &'a [PreyView],
    /// Ambient current offset for this tick.
    pub current: Vector,
}

/// Which behaviour drove a prey this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwimMode {
    /// Heading for a refuge or away from a predator.
    Flee,
    /// Heading for a pellet.
    Feed,
    /// Moving with the school.
    School,
    /// Dying prey do not move.
    Frozen,
}

/// Result of updating one prey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreyOutcome {
    /// Mode selected for the tick.
    pub mode: SwimMode,
    /// Pellet eaten this tick, if any.
    pub consumed: Option<PelletId>,
}

/// Advance one prey by a single tick.
///
/// Dying prey are left untouched and report [`SwimMode::Frozen`].
pub fn update_prey<R: Rng + ?Sized>(
    prey: &mut PreyEntity,
    ctx: &PreyContext<'_>,
    env: &mut Environment,
    cfg: &PreyConfig,
    rng: &mut R,
) -> PreyOutcome {
    if prey.is_dying() {
        return PreyOutcome {
            mode: SwimMode::Frozen,
            consumed: None,
        };
    }

    let origin = prey.position;
    let base = cfg.base_speed;
    let hunter_distance = origin.distance_to(ctx.hunter);

    let mut food_target: Option<(PelletId, Point)> = None;
    let (mode, mut velocity, cap) = if let Some(threat) = closest_threat(origin, ctx, cfg) {
        prey.set_hiding(true);
        let heading = env
            .nearest_refuge(origin)
            .map_or_else(|| threat.vector_to(origin), |refuge| origin.vector_to(refuge));
        let speed = base * cfg.flee_multiplier;
        (SwimMode::Flee, heading.with_length(speed), speed)
    } else if let Some(pellet) = env.nearest_pellet(origin) {
        prey.set_hiding(false);
        food_target = Some((pellet.id, pellet.position));
        let speed = base * cfg.feed_multiplier;
        (
            SwimMode::Feed,
            origin.vector_to(pellet.position).with_length(speed),
            speed,
        )
    } else {
        prey.set_hiding(false);
        (
            SwimMode::School,
            schooling_velocity(prey.id, origin, prey.velocity, ctx.school, cfg),
            base * cfg.max_chase_multiplier,
        )
    };

    velocity = velocity.add(jitter(cfg.jitter, rng));
    let displacement = velocity.limited(cap);

    let arena = env.arena();
    let wanted = origin.offset(displacement).offset(ctx.current);
    let (position, clamped) = arena.clamp(wanted, cfg.footprint);
    prey.position = position;

    if clamped.x && heads_into_wall(velocity.dx, wanted.x, position.x) {
        velocity.dx = -velocity.dx;
        let flipped = prey.facing.flipped();
        prey.facing = Facing::from_dx(velocity.dx).unwrap_or(flipped);
    } else if let Some(facing) = Facing::from_dx(velocity.dx) {
        prey.facing = facing;
    }
    if clamped.y && heads_into_wall(velocity.dy, wanted.y, position.y) {
        velocity.dy = -velocity.dy;
    }

    prey.velocity = velocity.with_length(base * chase_multiplier(hunter_distance, cfg));

    let consumed = food_target.and_then(|(id, at)| {
        (position.distance_to(at) < cfg.consumption_distance)
            .then(|| env.claim_pellet(id).map(|pellet| pellet.id))
            .flatten()
    });

    PreyOutcome { mode, consumed }
}

/// Whether a velocity component points past the wall a clamp stopped at.
///
/// The current alone can push a prey onto a wall it is swimming away from;
/// that velocity is left as it is.
fn heads_into_wall(component: f64, wanted: f64, clamped: f64) -> bool {
    if wanted < clamped {
        component < 0.0
    } else {
        component > 0.0
    }
}

/// The nearer predator, if either is inside the danger distance.
fn closest_threat(origin: Point, ctx: &PreyContext<'_>, cfg: &PreyConfig) -> Option<Point> {
    let hunter = origin.distance_to(ctx.hunter);
    let protector = origin.distance_to(ctx.protector);
    let (threat, distance) = if protector < hunter {
        (ctx.protector, protector)
    } else {
        (ctx.hunter, hunter)
    };
    (distance < cfg.danger_distance).then_some(threat)
}

/// Alignment and separation against neighbours within the school radius.
fn schooling_velocity(
    id: PreyId,
    origin: Point,
    velocity: Vector,
    school: &[PreyView],
    cfg: &PreyConfig,
) -> Vector {
    let mut heading_sum = Vector::ZERO;
    let mut neighbours: u32 = 0;
    let mut push = Vector::ZERO;

    for (other, distance) in spatial::within_radius(origin, school, cfg.neighbor_radius, |v| {
        v.position
    }) {
        if other.id == id {
            continue;
        }
        heading_sum = heading_sum.add(other.velocity);
        neighbours = neighbours.saturating_add(1);

        let distance_sq = distance * distance;
        if distance < cfg.separation_distance && distance_sq > EPSILON {
            let away = other.position.vector_to(origin);
            push = push.add(away.scale(cfg.separation_weight / distance_sq));
        }
    }

    let mut result = velocity;
    if neighbours > 0 {
        let mean = heading_sum.scale(1.0 / f64::from(neighbours));
        result = result.add(mean.sub(velocity).scale(cfg.alignment_blend));
    }
    result.add(push)
}

/// Speed multiplier from hunter proximity: 1.0 at the chase radius rising
/// quadratically to `max_chase_multiplier` at distance zero.
pub fn chase_multiplier(hunter_distance: f64, cfg: &PreyConfig) -> f64 {
    if cfg.chase_radius <= 0.0 || hunter_distance >= cfg.chase_radius {
        return 1.0;
    }
    let ratio = hunter_distance / cfg.chase_radius;
    (cfg.max_chase_multiplier - 1.0).mul_add(1.0 - ratio * ratio, 1.0)
}

fn jitter<R: Rng + ?Sized>(amount: f64, rng: &mut R) -> Vector {
    if amount <= 0.0 || !amount.is_finite() {
        return Vector::ZERO;
    }
    Vector::new(
        rng.random_range(-amount..=amount),
        rng.random_range(-amount..=amount),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use reeftank_types::{Arena, PreyColor, PreyState};
    use reeftank_world::AmbientCurrent;

    use super::*;

    fn quiet() -> PreyConfig {
        PreyConfig {
            jitter: 0.0,
            ..PreyConfig::default()
        }
    }

    fn fish(id: u32, x: f64, y: f64, vx: f64) -> PreyEntity {
        PreyEntity {
            id: PreyId(id),
            position: Point::new(x, y),
            velocity: Vector::new(vx, 0.0),
            facing: Facing::Right,
            color: PreyColor::Coral,
            state: PreyState::default(),
        }
    }

    fn tank(refuges: Vec<Point>) -> Environment {
        Environment::new(Arena::new(1000.0, 800.0), refuges, AmbientCurrent::STILL)
    }

    fn far_ctx(school: &[PreyView]) -> PreyContext<'_> {
        PreyContext {
            hunter: Point::new(5000.0, 5000.0),
            protector: Point::new(-5000.0, -5000.0),
            school,
            current: Vector::ZERO,
        }
    }

    #[test]
    fn threatened_prey_heads_for_refuge_and_hides() {
        let mut env = tank(vec![Point::new(100.0, 400.0)]);
        let mut prey = fish(0, 500.0, 400.0, 0.5);
        let ctx = PreyContext {
            hunter: Point::new(550.0, 400.0),
            protector: Point::new(-5000.0, 0.0),
            school: &[],
            current: Vector::ZERO,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let out = update_prey(&mut prey, &ctx, &mut env, &quiet(), &mut rng);
        assert_eq!(out.mode, SwimMode::Flee);
        assert!(prey.is_hiding());
        assert!((prey.position.x - 499.0).abs() < 1e-9);
        assert_eq!(prey.facing, Facing::Left);
    }

    #[test]
    fn without_refuges_prey_flees_away_from_threat() {
        let mut env = tank(Vec::new());
        let mut prey = fish(0, 500.0, 400.0, -0.5);
        let ctx = PreyContext {
            hunter: Point::new(450.0, 400.0),
            protector: Point::new(-5000.0, 0.0),
            school: &[],
            current: Vector::ZERO,
        };
        let mut rng = StdRng::seed_from_u64(1);
        update_prey(&mut prey, &ctx, &mut env, &quiet(), &mut rng);
        assert!(prey.position.x > 500.0);
        assert_eq!(prey.facing, Facing::Right);
    }

    #[test]
    fn threat_overrides_food() {
        let mut env = tank(vec![Point::new(500.0, 700.0)]);
        env.spawn_pellet(Point::new(505.0, 400.0), None, 10_000, 0)
            .unwrap();
        let mut prey = fish(0, 500.0, 400.0, 0.5);
        let ctx = PreyContext {
            hunter: Point::new(600.0, 400.0),
            protector: Point::new(-5000.0, 0.0),
            school: &[],
            current: Vector::ZERO,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let out = update_prey(&mut prey, &ctx, &mut env, &quiet(), &mut rng);
        assert_eq!(out.mode, SwimMode::Flee);
        assert!(out.consumed.is_none());
        assert_eq!(env.pellets().len(), 1);
    }

    #[test]
    fn pellet_within_reach_is_eaten_on_first_tick() {
        let mut env = tank(Vec::new());
        let id = env
            .spawn_pellet(Point::new(515.0, 400.0), None, 10_000, 0)
            .unwrap();
        let mut prey = fish(0, 500.0, 400.0, 0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let out = update_prey(&mut prey, &far_ctx(&[]), &mut env, &quiet(), &mut rng);
        assert_eq!(out.mode, SwimMode::Feed);
        assert_eq!(out.consumed, Some(id));
        assert!(env.pellets().is_empty());
        assert!(!prey.is_hiding());
    }

    #[test]
    fn separation_pushes_close_neighbours_apart() {
        let mut env = tank(Vec::new());
        let a = fish(0, 500.0, 400.0, 0.0);
        let b = fish(1, 510.0, 400.0, 0.0);
        let school = [PreyView::from(&a), PreyView::from(&b)];
        let mut prey = a;
        let mut rng = StdRng::seed_from_u64(5);
        let out = update_prey(&mut prey, &far_ctx(&school), &mut env, &quiet(), &mut rng);
        assert_eq!(out.mode, SwimMode::School);
        assert!(prey.position.x < 500.0);
    }

    #[test]
    fn alignment_pulls_towards_mean_heading() {
        let mut env = tank(Vec::new());
        let a = fish(0, 500.0, 400.0, 0.0);
        let mut b = fish(1, 560.0, 400.0, 0.0);
        b.velocity = Vector::new(0.0, 0.5);
        let school = [PreyView::from(&a), PreyView::from(&b)];
        let mut prey = a;
        let mut rng = StdRng::seed_from_u64(5);
        update_prey(&mut prey, &far_ctx(&school), &mut env, &quiet(), &mut rng);
        assert!(prey.position.y > 400.0);
        assert!((prey.velocity.length() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn wall_hit_reflects_and_flips() {
        let mut env = tank(Vec::new());
        let mut prey = fish(0, 959.8, 400.0, 0.5);
        let mut rng = StdRng::seed_from_u64(9);
        update_prey(&mut prey, &far_ctx(&[]), &mut env, &quiet(), &mut rng);
        assert!((prey.position.x - 960.0).abs() < 1e-9);
        assert!(prey.velocity.dx < 0.0);
        assert_eq!(prey.facing, Facing::Left);
    }

    #[test]
    fn current_onto_wall_does_not_reverse_retreating_prey() {
        let mut env = tank(Vec::new());
        let mut prey = fish(0, 960.0, 760.0, -0.1);
        prey.velocity = Vector::new(-0.1, -0.1);
        prey.facing = Facing::Left;
        let ctx = PreyContext {
            current: Vector::new(0.5, 0.5),
            ..far_ctx(&[])
        };
        let mut rng = StdRng::seed_from_u64(9);
        update_prey(&mut prey, &ctx, &mut env, &quiet(), &mut rng);
        assert_eq!(prey.position, Point::new(960.0, 760.0));
        assert!(prey.velocity.dx < 0.0);
        assert!(prey.velocity.dy < 0.0);
        assert_eq!(prey.facing, Facing::Left);
    }

    #[test]
    fn nearby_hunter_speeds_up_stored_velocity() {
        let cfg = quiet();
        let mut env = tank(Vec::new());
        let mut prey = fish(0, 500.0, 400.0, 0.5);
        let ctx = PreyContext {
            hunter: Point::new(600.0, 400.0),
            ..far_ctx(&[])
        };
        let mut rng = StdRng::seed_from_u64(4);
        update_prey(&mut prey, &ctx, &mut env, &cfg, &mut rng);
        let expected = cfg.base_speed * 1.375;
        assert!((prey.velocity.length() - expected).abs() < 1e-9);
    }

    #[test]
    fn dying_prey_is_frozen() {
        let mut env = tank(Vec::new());
        let mut prey = fish(0, 500.0, 400.0, 0.5);
        prey.state = PreyState::Dying { since_ms: 10 };
        let before = prey.clone();
        let mut rng = StdRng::seed_from_u64(2);
        let out = update_prey(&mut prey, &far_ctx(&[]), &mut env, &quiet(), &mut rng);
        assert_eq!(out.mode, SwimMode::Frozen);
        assert_eq!(prey, before);
    }

    #[test]
    fn displacement_respects_mode_cap() {
        let cfg = PreyConfig::default();
        let mut env = tank(Vec::new());
        let mut rng = StdRng::seed_from_u64(11);
        let crowd: Vec<PreyEntity> = (0..6)
            .map(|i| fish(i, 500.0 + f64::from(i), 400.0, 0.5))
            .collect();
        let school: Vec<PreyView> = crowd.iter().map(PreyView::from).collect();
        for mut prey in crowd {
            let before = prey.position;
            update_prey(&mut prey, &far_ctx(&school), &mut env, &cfg, &mut rng);
            let moved = before.distance_to(prey.position);
            assert!(moved <= cfg.base_speed * cfg.max_chase_multiplier + 1e-9);
        }
    }

    #[test]
    fn chase_multiplier_rises_near_hunter() {
        let cfg = PreyConfig::default();
        assert!((chase_multiplier(500.0, &cfg) - 1.0).abs() < 1e-12);
        assert!((chase_multiplier(200.0, &cfg) - 1.0).abs() < 1e-12);
        assert!((chase_multiplier(0.0, &cfg) - 1.5).abs() < 1e-12);
        let mid = chase_multiplier(100.0, &cfg);
        assert!((mid - 1.375).abs() < 1e-12);
    }
}
