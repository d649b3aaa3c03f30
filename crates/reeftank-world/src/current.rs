//! Ambient water current.
//!
//! The current is a slow sinusoidal drift applied to every entity's position
//! each tick, independent of what the entity decides to do. Each axis has its
//! own period so the drift traces a Lissajous figure instead of a line.

use std::f64::consts::TAU;

use reeftank_types::Vector;
use serde::Deserialize;

/// Parameters of the ambient drift.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmbientCurrent {
    /// Peak horizontal offset per tick.
    pub amplitude_x: f64,
    /// Peak vertical offset per tick.
    pub amplitude_y: f64,
    /// Horizontal oscillation period in simulated milliseconds.
    pub period_x_ms: f64,
    /// Vertical oscillation period in simulated milliseconds.
    pub period_y_ms: f64,
}

impl Default for AmbientCurrent {
    fn default() -> Self {
        Self {
            amplitude_x: 0.15,
            amplitude_y: 0.1,
            period_x_ms: 8_000.0,
            period_y_ms: 11_000.0,
        }
    }
}

impl AmbientCurrent {
    /// A current that never moves anything.
    pub const STILL: Self = Self {
        amplitude_x: 0.0,
        amplitude_y: 0.0,
        period_x_ms: 1.0,
        period_y_ms: 1.0,
    };

    /// Per-tick positional offset at simulation time `now_ms`.
    ///
    /// A non-positive period disables that axis.
    #[allow(clippy::cast_precision_loss)]
    pub fn offset_at(&self, now_ms: u64) -> Vector {
        let t = now_ms as f64;
        Vector::new(
            axis_offset(self.amplitude_x, self.period_x_ms, t),
            axis_offset(self.amplitude_y, self.period_y_ms, t),
        )
    }
}

fn axis_offset(amplitude: f64, period_ms: f64, t: f64) -> f64 {
    if period_ms <= 0.0 || !period_ms.is_finite() {
        return 0.0;
    }
    amplitude * (TAU * t / period_ms).sin()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_bounded_by_amplitude() {
        let current = AmbientCurrent::default();
        for t in (0..40_000).step_by(250) {
            let v = current.offset_at(t);
            assert!(v.dx.abs() <= current.amplitude_x + 1e-12);
            assert!(v.dy.abs() <= current.amplitude_y + 1e-12);
        }
    }

    #[test]
    fn offset_varies_over_time() {
        let current = AmbientCurrent::default();
        let a = current.offset_at(0);
        let b = current.offset_at(2_000);
        assert!((a.dx - b.dx).abs() > 1e-6);
    }

    #[test]
    fn still_current_is_zero() {
        let v = AmbientCurrent::STILL.offset_at(12_345);
        assert!(v.length() < 1e-12);
    }

    #[test]
    fn zero_period_disables_axis() {
        let current = AmbientCurrent {
            period_y_ms: 0.0,
            ..AmbientCurrent::default()
        };
        assert!(current.offset_at(3_000).dy.abs() < 1e-12);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let current: AmbientCurrent = serde_yml::from_str("amplitude_x: 0.4\n").unwrap();
        assert!((current.amplitude_x - 0.4).abs() < 1e-12);
        assert!((current.amplitude_y - 0.1).abs() < 1e-12);
        assert!((current.period_x_ms - 8_000.0).abs() < 1e-12);
        assert!((current.period_y_ms - 11_000.0).abs() < 1e-12);
    }
}
