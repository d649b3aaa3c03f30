//! Operator control state for runtime simulation management.
//!
//! This module provides shared state used by the tick loop and whatever
//! feeds it commands (the console reader, a signal handler). The operator
//! can pause/resume, change tick speed, drop food, and trigger a clean
//! shutdown, all without stopping the process.
//!
//! # Architecture
//!
//! All mutable control fields use [`std::sync::atomic`] types so they can be
//! shared through an [`Arc`](std::sync::Arc) between the tick loop task and
//! input tasks without locks on the hot path. Food requests are queued
//! behind a [`tokio::sync::Mutex`] and drained at the start of each tick.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use reeftank_types::Point;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::SimulationBoundsConfig;

/// Smallest tick interval the operator may set at runtime.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Reason why the simulation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// An operator issued a stop command.
    OperatorStop,
    /// Every prey has been eaten.
    Extinction,
}

/// A request to drop a food pellet, applied before the next tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRequest {
    /// Where the pellet should land.
    pub position: Point,
    /// Pellet diameter; the configured default when absent.
    pub size: Option<f64>,
    /// Pellet lifetime in simulated milliseconds; the configured default
    /// when absent.
    pub duration_ms: Option<u64>,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the simulation is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the tick loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Wall-clock time when the simulation started.
    started_at: DateTime<Utc>,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Maximum wall-clock seconds (0 = unlimited).
    max_real_time_seconds: u64,

    /// Whether the run ends when the last prey is removed.
    stop_on_extinction: bool,

    /// Food drops awaiting the next tick.
    food_requests: Mutex<Vec<FoodRequest>>,

    /// Reason the simulation ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Create a new operator state from configuration.
    pub fn new(tick_interval_ms: u64, bounds: &SimulationBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            started_at: Utc::now(),
            max_ticks: bounds.max_ticks,
            max_real_time_seconds: bounds.max_real_time_seconds,
            stop_on_extinction: bounds.stop_on_extinction,
            food_requests: Mutex::new(Vec::new()),
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. The tick loop will sleep until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation and wake the tick loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the simulation is no longer paused.
    ///
    /// Returns immediately if not paused. A stop request also ends the wait
    /// so a paused simulation can still be shut down.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean simulation stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the simulation ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the simulation ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason.lock().await.clone()
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval on success, or `None` if the value was
    /// below [`MIN_TICK_INTERVAL_MS`].
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        let prev = self.tick_interval_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Check whether the wall-clock time limit has been reached.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Whether the run should end once no prey remain.
    pub const fn stop_on_extinction(&self) -> bool {
        self.stop_on_extinction
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed wall-clock seconds since simulation start.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        // `num_seconds` can be negative if the system clock steps back.
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Get the configured max real-time seconds.
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }

    // -----------------------------------------------------------------------
    // Food
    // -----------------------------------------------------------------------

    /// Queue a pellet drop for the next tick.
    pub async fn request_food(&self, request: FoodRequest) {
        let mut queue = self.food_requests.lock().await;
        queue.push(request);
    }

    /// Drain all queued food requests in arrival order.
    pub async fn drain_food_requests(&self) -> Vec<FoodRequest> {
        let mut queue = self.food_requests.lock().await;
        std::mem::take(&mut *queue)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn default_bounds() -> SimulationBoundsConfig {
        SimulationBoundsConfig::default()
    }

    #[test]
    fn initial_state_is_not_paused() {
        let state = OperatorState::new(50, &default_bounds());
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let state = OperatorState::new(50, &default_bounds());
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn set_tick_interval() {
        let state = OperatorState::new(50, &default_bounds());
        assert_eq!(state.set_tick_interval_ms(200), Some(50));
        assert_eq!(state.tick_interval_ms(), 200);
    }

    #[test]
    fn reject_sub_minimum_interval() {
        let state = OperatorState::new(50, &default_bounds());
        assert!(state.set_tick_interval_ms(5).is_none());
        assert_eq!(state.tick_interval_ms(), 50);
    }

    #[test]
    fn tick_limit_zero_means_unlimited() {
        let state = OperatorState::new(50, &default_bounds());
        assert!(!state.tick_limit_reached(999_999));
        assert!(!state.time_limit_reached());
    }

    #[test]
    fn tick_limit_reached() {
        let bounds = SimulationBoundsConfig {
            max_ticks: 100,
            ..SimulationBoundsConfig::default()
        };
        let state = OperatorState::new(50, &bounds);
        assert!(!state.tick_limit_reached(99));
        assert!(state.tick_limit_reached(100));
    }

    #[tokio::test]
    async fn request_and_drain_food() {
        let state = OperatorState::new(50, &default_bounds());
        state
            .request_food(FoodRequest {
                position: Point::new(10.0, 20.0),
                size: None,
                duration_ms: Some(500),
            })
            .await;
        state
            .request_food(FoodRequest {
                position: Point::new(30.0, 40.0),
                size: Some(20.0),
                duration_ms: None,
            })
            .await;
        let drained = state.drain_food_requests().await;
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].position, Point::new(10.0, 20.0));
        assert!(state.drain_food_requests().await.is_empty());
    }

    #[tokio::test]
    async fn resume_wakes_waiter() {
        let state = Arc::new(OperatorState::new(50, &default_bounds()));
        state.pause();
        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.wait_if_paused().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        state.resume();
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn stop_releases_paused_waiter() {
        let state = Arc::new(OperatorState::new(50, &default_bounds()));
        state.pause();
        state.request_stop();
        let joined = tokio::time::timeout(Duration::from_secs(1), state.wait_if_paused()).await;
        assert!(joined.is_ok());
    }
}
