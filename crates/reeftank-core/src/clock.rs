//! Simulation clock.
//!
//! The clock is the single source of truth for simulated time. It counts
//! completed ticks and the simulated milliseconds they covered; every
//! time-keyed behaviour (patrol path, current, pellet expiry, death
//! animation) reads `elapsed_ms` from here and never from the wall clock.
//!
//! All advances use checked arithmetic so a counter can never wrap.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Elapsed time would overflow.
    #[error("elapsed time overflow: {elapsed_ms} + {dt_ms} exceeds u64::MAX")]
    ElapsedOverflow {
        /// Elapsed milliseconds before the advance.
        elapsed_ms: u64,
        /// Requested step.
        dt_ms: u64,
    },
}

/// Tick counter plus simulated elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldClock {
    /// Number of completed ticks.
    tick: u64,

    /// Simulated milliseconds since the simulation started.
    elapsed_ms: u64,
}

impl WorldClock {
    /// A clock at tick 0, time 0.
    pub const fn new() -> Self {
        Self {
            tick: 0,
            elapsed_ms: 0,
        }
    }

    /// Create a clock from explicit parameters (useful for testing and
    /// state restoration).
    pub const fn from_parts(tick: u64, elapsed_ms: u64) -> Self {
        Self { tick, elapsed_ms }
    }

    /// Advance by one tick covering `dt_ms` simulated milliseconds.
    /// Returns the new tick number.
    ///
    /// The clock is unchanged when either counter would overflow.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] or
    /// [`ClockError::ElapsedOverflow`].
    pub fn advance(&mut self, dt_ms: u64) -> Result<u64, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let elapsed_ms =
            self.elapsed_ms
                .checked_add(dt_ms)
                .ok_or(ClockError::ElapsedOverflow {
                    elapsed_ms: self.elapsed_ms,
                    dt_ms,
                })?;
        self.tick = tick;
        self.elapsed_ms = elapsed_ms;
        Ok(tick)
    }

    /// Return the number of completed ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Return simulated milliseconds since start.
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
