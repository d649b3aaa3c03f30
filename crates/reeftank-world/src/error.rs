//! Error types for the `reeftank-world` crate.

/// Errors raised by environment operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Every pellet identifier has been handed out.
    #[error("pellet identifiers exhausted")]
    PelletIdsExhausted,

    /// A pellet was requested at a non-finite position.
    #[error("pellet position is not finite: ({x}, {y})")]
    InvalidPelletPosition {
        /// Requested x coordinate.
        x: f64,
        /// Requested y coordinate.
        y: f64,
    },
}
