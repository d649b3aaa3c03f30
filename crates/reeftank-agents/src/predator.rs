//! Hunter and protector movement.
//!
//! The hunter chases the nearest live prey. The protector shadows the hunter
//! whenever it is close to the school and, if it gets close enough, throws
//! the hunter clear. When the hunter is nowhere near prey the protector
//! drifts along a slow Lissajous patrol. Two predators that come too close
//! shove each other apart, and both finally ride the ambient current and are
//! clamped to the arena.

use reeftank_types::{Arena, EPSILON, Facing, Point, PredatorEntity, PreyId, Vector};
use reeftank_world::spatial;

use crate::config::PredatorConfig;
use crate::prey::PreyView;

/// Predators closer than this to their target hold position.
const ARRIVAL_DISTANCE: f64 = 1.0;

/// What the protector did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectorAction {
    /// Threw the hunter away from the school.
    Repelled,
    /// Moved towards the hunter.
    Closing,
    /// Followed its idle patrol path.
    Patrolling,
}

/// Summary of one predator pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredatorOutcome {
    /// Prey the hunter swam towards, if any.
    pub hunter_target: Option<PreyId>,
    /// The protector's choice for the tick.
    pub protector: ProtectorAction,
    /// Whether the two predators were pushed apart.
    pub competed: bool,
}

/// Inputs shared by the predator pass.
#[derive(Debug, Clone, Copy)]
pub struct PredatorContext<'a> {
    /// Non-dying prey as of the end of the previous tick.
    pub prey: &'a [PreyView],
    /// Simulation time at the end of this tick.
    pub now_ms: u64,
    /// Ambient current offset for this tick.
    pub current: Vector,
    /// Tank bounds.
    pub arena: Arena,
}

/// Run the full predator pass: pursuit, protection, competition, current.
pub fn advance_predators(
    hunter: &mut PredatorEntity,
    protector: &mut PredatorEntity,
    ctx: &PredatorContext<'_>,
    cfg: &PredatorConfig,
) -> PredatorOutcome {
    let hunter_before = hunter.position;
    let hunter_target = pursue(hunter, ctx.prey);
    let action = guard(protector, hunter, hunter_before, ctx.prey, ctx.now_ms, cfg);
    let competed = compete(hunter, protector, cfg);

    drift(hunter, ctx.current, ctx.arena, cfg.hunter_footprint);
    drift(protector, ctx.current, ctx.arena, cfg.protector_footprint);

    PredatorOutcome {
        hunter_target,
        protector: action,
        competed,
    }
}

/// Move the hunter one step towards the nearest prey.
///
/// Returns the target. The hunter holds when there is no prey.
pub fn pursue(hunter: &mut PredatorEntity, prey: &[PreyView]) -> Option<PreyId> {
    let target = spatial::nearest_by(hunter.position, prey, |v| v.position)?;
    move_towards(hunter, target.position);
    Some(target.id)
}

/// Protector decision for the tick.
///
/// `hunter` has already moved this tick. Closing targets the hunter's
/// position before that move.
pub fn guard(
    protector: &mut PredatorEntity,
    hunter: &mut PredatorEntity,
    hunter_before: Point,
    prey: &[PreyView],
    now_ms: u64,
    cfg: &PredatorConfig,
) -> ProtectorAction {
    let near_prey = spatial::nearest_by(hunter.position, prey, |v| v.position)
        .is_some_and(|v| hunter.position.distance_to(v.position) < cfg.guard_prey_radius);

    if !near_prey {
        patrol(protector, now_ms, cfg);
        return ProtectorAction::Patrolling;
    }

    if protector.position.distance_to(hunter.position) < cfg.guard_hunter_radius {
        repel(hunter, protector.position, cfg.repel_distance);
        return ProtectorAction::Repelled;
    }

    move_towards(protector, hunter_before);
    ProtectorAction::Closing
}

/// Throw the hunter `distance` units directly away from `from`.
fn repel(hunter: &mut PredatorEntity, from: Point, distance: f64) {
    let away = from.vector_to(hunter.position);
    let heading = if away.length() * away.length() <= EPSILON {
        Vector::new(1.0, 0.0)
    } else {
        away.normalized()
    };
    hunter.position = hunter.position.offset(heading.scale(distance));
    if let Some(facing) = Facing::from_dx(heading.dx) {
        hunter.facing = facing;
    }
}

/// Idle movement along a Lissajous path keyed to simulation time.
#[allow(clippy::cast_precision_loss)]
fn patrol(protector: &mut PredatorEntity, now_ms: u64, cfg: &PredatorConfig) {
    let t = now_ms as f64;
    let step = Vector::new(
        phase(t, cfg.patrol_period_x_ms).cos() * cfg.patrol_step,
        phase(t, cfg.patrol_period_y_ms).sin() * cfg.patrol_step,
    );
    protector.position = protector.position.offset(step);
    if let Some(facing) = Facing::from_dx(step.dx) {
        protector.facing = facing;
    }
}

fn phase(t: f64, period_ms: f64) -> f64 {
    if period_ms <= 0.0 { 0.0 } else { t / period_ms }
}

/// Push two predators apart if they are closer than the competition
/// distance. Each moves by its own speed times the nudge factor.
pub fn compete(a: &mut PredatorEntity, b: &mut PredatorEntity, cfg: &PredatorConfig) -> bool {
    let between = a.position.vector_to(b.position);
    let distance = between.length();
    if distance >= cfg.competition_distance {
        return false;
    }
    let axis = if distance * distance <= EPSILON {
        Vector::new(1.0, 0.0)
    } else {
        between.scale(1.0 / distance)
    };
    a.position = a.position.offset(axis.scale(-a.speed * cfg.competition_nudge));
    b.position = b.position.offset(axis.scale(b.speed * cfg.competition_nudge));
    true
}

/// Step `entity` by its speed towards `target`, turning to face it.
///
/// Holds position within [`ARRIVAL_DISTANCE`] of the target.
pub fn move_towards(entity: &mut PredatorEntity, target: Point) {
    let delta = entity.position.vector_to(target);
    if delta.length() < ARRIVAL_DISTANCE {
        return;
    }
    entity.position = entity.position.offset(delta.with_length(entity.speed));
    if let Some(facing) = Facing::from_dx(delta.dx) {
        entity.facing = facing;
    }
}

fn drift(entity: &mut PredatorEntity, current: Vector, arena: Arena, footprint: f64) {
    let (position, _) = arena.clamp(entity.position.offset(current), footprint);
    entity.position = position;
}
