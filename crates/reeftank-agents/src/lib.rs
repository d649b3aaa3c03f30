//! Animal behaviour for the Reeftank simulation.
//!
//! Everything here is a plain function over entity state: no clocks, no
//! I/O, no shared ownership. The core tick pipeline decides the order in
//! which these run and what each one is allowed to observe.
//!
//! # Modules
//!
//! - [`config`] -- Tuning parameters with serde defaults.
//! - [`predation`] -- Alive, being eaten, dying, removed.
//! - [`predator`] -- Hunter pursuit, protector intervention and patrol,
//!   predator competition.
//! - [`prey`] -- Hiding, feeding, and schooling.

pub mod config;
pub mod predation;
pub mod predator;
pub mod prey;

// Re-export primary types at crate root.
pub use config::{PredationConfig, PredatorConfig, PreyConfig};
pub use predation::Transition;
pub use predator::{PredatorContext, PredatorOutcome, ProtectorAction, advance_predators};
pub use prey::{PreyContext, PreyOutcome, PreyView, SwimMode, update_prey};
