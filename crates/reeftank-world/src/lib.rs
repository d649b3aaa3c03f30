//! Tank surroundings for the Reeftank simulation.
//!
//! This crate models everything the animals react to but do not control:
//! food pellets with finite lifetimes, fixed refuges, and a slow ambient
//! current. It also hosts the linear-scan spatial queries shared by the
//! behaviour layer.
//!
//! # Modules
//!
//! - [`current`] -- Sinusoidal drift applied to every entity each tick.
//! - [`environment`] -- [`Environment`] bundles arena, pellets, refuges, and
//!   current behind one interface.
//! - [`error`] -- Error types for environment operations.
//! - [`food`] -- Pellet storage with expiry and exclusive claiming.
//! - [`spatial`] -- Nearest-neighbour and radius queries.

pub mod current;
pub mod environment;
pub mod error;
pub mod food;
pub mod spatial;

// Re-export primary types at crate root.
pub use current::AmbientCurrent;
pub use environment::{DEFAULT_PELLET_SIZE, Environment};
pub use error::WorldError;
pub use food::PelletStore;
