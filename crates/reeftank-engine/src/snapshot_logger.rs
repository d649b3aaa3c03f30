//! Tick callback that reports tank state through the log stream.
//!
//! Every tick gets a one-line progress record at `trace` level. Every
//! `interval` ticks the full [`WorldSnapshot`] is serialized to JSON and
//! emitted at `info` level so a renderer or a log file can replay the tank.
//!
//! [`WorldSnapshot`]: reeftank_types::WorldSnapshot

use reeftank_core::runner::TickCallback;
use reeftank_core::snapshot;
use reeftank_core::tick::{SimulationState, TickSummary};
use tracing::{info, trace, warn};

/// Callback that writes periodic snapshots to the log.
pub struct SnapshotLogger {
    interval: u64,
    emitted: u64,
}

impl SnapshotLogger {
    /// Create a logger that emits a snapshot every `interval` ticks.
    ///
    /// An interval of zero disables snapshots; progress records are still
    /// written.
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            emitted: 0,
        }
    }

    /// Number of snapshots written so far.
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    const fn is_due(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.interval), Some(0))
    }
}

impl TickCallback for SnapshotLogger {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        trace!(
            tick = summary.tick,
            prey_alive = summary.prey_alive,
            pellets = state.environment.pellets().len(),
            hunter_target = ?summary.hunter_target,
            "Tick complete"
        );

        if !self.is_due(summary.tick) {
            return;
        }

        match serde_json::to_string(&snapshot::take(state)) {
            Ok(json) => {
                self.emitted = self.emitted.saturating_add(1);
                info!(tick = summary.tick, snapshot = %json, "World snapshot");
            }
            Err(err) => warn!(tick = summary.tick, %err, "Failed to serialize snapshot"),
        }
    }
}
