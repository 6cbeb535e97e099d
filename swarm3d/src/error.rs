use thiserror::Error;

/// Errors reported while building a simulation from its configuration.
///
/// Nothing on the per-frame path returns an error: numeric corner cases such as coincident
/// particles or a degenerate camera are handled where they occur.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter that must be strictly positive was not.
    #[error("`{field}` must be strictly positive, got {value}")]
    NonPositive {
        /// Dotted path of the offending configuration field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A parameter that must be a finite number was NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Dotted path of the offending configuration field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A parameter that must not be negative was.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Dotted path of the offending configuration field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The particle store cannot hold any particle.
    #[error("particle capacity must be at least 1")]
    ZeroCapacity,
    /// The zoom range is empty or starts below zero.
    #[error("invalid zoom range [{min}, {max}]")]
    InvalidZoomRange {
        /// Closest zoom.
        min: f64,
        /// Farthest zoom.
        max: f64,
    },
    /// The restitution coefficient is outside `[0, 1]`.
    #[error("restitution must be within [0, 1], got {0}")]
    InvalidRestitution(f64),
    /// The drag factor is outside `(0, 1]`.
    #[error("drag must be within (0, 1], got {0}")]
    InvalidDrag(f64),
    /// The speed multiplier is outside the supported range.
    #[error("speed must be within [{min}, {max}], got {value}", min = crate::gravity::SPEED_RANGE.start(), max = crate::gravity::SPEED_RANGE.end())]
    InvalidSpeed {
        /// The rejected multiplier.
        value: f64,
    },
    /// Spawned particles have no colour to pick from.
    #[error("spawn palette is empty")]
    EmptyPalette,
    /// An operation needs the attractor interaction mode.
    #[error("no attractor configured, interaction mode is pairwise")]
    MissingAttractor,
    /// The configuration document could not be parsed.
    #[error("could not parse configuration")]
    Parse(#[from] serde_yaml::Error),
}
