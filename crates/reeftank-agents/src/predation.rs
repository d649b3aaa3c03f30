//! Prey lifecycle under attack.
//!
//! ```text
//! Alive ──bite──> BeingEaten ──release──> Dying ──animation done──> Removed
//! ```
//!
//! A bite needs the hunter within attack range *and* facing the prey. A prey
//! held by the hunter stays held only while both conditions keep holding;
//! the moment either fails it is released and starts dying. There is no way
//! back from dying.

use reeftank_types::{PredatorEntity, PreyEntity, PreyState};

use crate::config::PredationConfig;

/// Lifecycle change produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    None,
    /// Alive to `BeingEaten`.
    Seized,
    /// `BeingEaten` to `Dying`.
    Released,
    /// The death animation finished; the caller must drop the prey.
    Removed,
}

/// Whether `hunter` is close enough to, and facing, `prey`.
pub fn can_bite(prey: &PreyEntity, hunter: &PredatorEntity, cfg: &PredationConfig) -> bool {
    prey.position.distance_to(hunter.position) < cfg.attack_range
        && hunter.facing.points_along(prey.position.x - hunter.position.x)
}

/// Advance the lifecycle of one prey at simulation time `now_ms`.
pub fn evaluate(
    prey: &mut PreyEntity,
    hunter: &PredatorEntity,
    now_ms: u64,
    cfg: &PredationConfig,
) -> Transition {
    match prey.state {
        PreyState::Alive { hiding } => {
            if can_bite(prey, hunter, cfg) {
                prey.state = PreyState::BeingEaten { hiding };
                Transition::Seized
            } else {
                Transition::None
            }
        }
        PreyState::BeingEaten { .. } => {
            if can_bite(prey, hunter, cfg) {
                Transition::None
            } else {
                prey.state = PreyState::Dying { since_ms: now_ms };
                Transition::Released
            }
        }
        PreyState::Dying { since_ms } => {
            if now_ms.saturating_sub(since_ms) >= cfg.death_animation_ms {
                Transition::Removed
            } else {
                Transition::None
            }
        }
    }
}
