//! Pannable area error types

use std::path::PathBuf;

use thiserror::Error;

use crate::surface::RegionId;

/// Precondition failures reported by the controller API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PannableError {
    /// The operation needs a content surface and none is attached
    #[error("no scrollable surface attached")]
    NoSurface,

    /// The region is not part of the attached surface
    #[error("region {0:?} is not a descendant of the attached surface")]
    NotDescendant(RegionId),
}

/// Configuration rejected at the configuration boundary
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("velocity_min ({min}) exceeds velocity_max ({max})")]
    VelocityBounds { min: f64, max: f64 },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, PannableError>;
