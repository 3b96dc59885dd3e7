//! Error types for simulation setup.
//!
//! Only initialization can fail. Once a [`Simulation`](crate::simulation::Simulation)
//! exists, every tick is infallible: spawn failures, missing targets and
//! degenerate vectors are policy branches handled in place.

use thiserror::Error;

/// Errors raised while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The canvas has a zero, negative or non-finite dimension.
    #[error("canvas must be positive and finite, got {width}x{height}")]
    InvalidCanvas {
        /// Configured canvas width.
        width: f32,
        /// Configured canvas height.
        height: f32,
    },

    /// The channel does not fit strictly inside the canvas.
    #[error("channel width {channel_width} does not fit inside canvas width {canvas_width}")]
    InvalidChannel {
        /// Configured channel width.
        channel_width: f32,
        /// Configured canvas width.
        canvas_width: f32,
    },

    /// A duration that must be positive was zero.
    #[error("duration `{field}` must be greater than zero")]
    ZeroDuration {
        /// Dotted path of the offending field.
        field: &'static str,
    },

    /// A size, speed or radius that must be positive was not.
    #[error("`{field}` must be positive and finite, got {value}")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A min/max pair is inverted.
    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Configured minimum.
        min: u64,
        /// Configured maximum.
        max: u64,
    },

    /// The army roster is empty.
    #[error("army roster must contain at least one personality")]
    EmptyRoster,

    /// The JSON document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
