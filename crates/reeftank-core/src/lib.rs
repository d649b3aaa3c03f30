//! Simulation clock, tick pipeline, and orchestration for the Reeftank simulation.
//!
//! This crate owns the ordered tick pass that drives the tank: clock,
//! environment upkeep, prey, predators, predation, and pruning.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and simulated elapsed time.
//! - [`config`] -- Configuration loading from `reeftank-config.yaml` into
//!   strongly-typed structs.
//! - [`operator`] -- Pause, resume, speed, stop, and queued food drops.
//! - [`runner`] -- The async tick loop with its termination conditions.
//! - [`snapshot`] -- Owned read-only copies of the tank for renderers.
//! - [`tick`] -- [`SimulationState`] and the single-tick pipeline.
//!
//! [`SimulationState`]: tick::SimulationState

pub mod clock;
pub mod config;
pub mod operator;
pub mod runner;
pub mod snapshot;
pub mod tick;
