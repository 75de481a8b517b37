//! Error types for invalid construction or reconfiguration parameters.
//!
//! Numerical edge cases hit during a frame (grazing refraction, oversized time
//! steps, near-zero divisors) are never reported here; they are clamped where
//! they happen so playback keeps going.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Tile size must be a power of two in {min}..={max}, got {size}")]
    UnsupportedTileSize { size: usize, min: usize, max: usize },

    #[error("Grid size must be at least {min}, got {size}")]
    GridTooSmall { size: usize, min: usize },

    #[error("Texture size must be in 1..={max}, got {size}")]
    UnsupportedTextureSize { size: usize, max: usize },

    #[error("Wind vector must have a non-zero magnitude")]
    ZeroWind,

    #[error("{name} must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be >= 0, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{name} must be in {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Require a finite, strictly positive value.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

/// Require a finite, non-negative value.
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
