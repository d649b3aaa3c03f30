//! Shared type definitions for the Reeftank ecosystem simulation.
//!
//! This crate is the single source of truth for the data that flows between
//! the simulation layers and out to the renderer. Types derive `ts-rs` so the
//! browser front end can consume snapshots with matching `TypeScript`
//! definitions.
//!
//! # Modules
//!
//! - [`arena`] -- Tank bounds and footprint-aware clamping
//! - [`entities`] -- Prey, predators, food pellets, lifecycle states
//! - [`geometry`] -- Points, vectors, sprite facing
//! - [`ids`] -- Integer identifier wrappers
//! - [`snapshot`] -- Per-tick export for the renderer

pub mod arena;
pub mod entities;
pub mod geometry;
pub mod ids;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use arena::{Arena, ClampedAxes};
pub use entities::{FoodPellet, PredatorEntity, PredatorKind, PreyColor, PreyEntity, PreyState};
pub use geometry::{EPSILON, Facing, Point, Vector};
pub use ids::{PelletId, PreyId};
pub use snapshot::WorldSnapshot;
