//! Parameter definitions with physical units and documented semantics.
//!
//! All tunables are gathered here with:
//! - Physical units (meters, seconds, etc.)
//! - Documented defaults and meanings
//! - Validation returning [`ConfigError`](crate::error::ConfigError)

mod caustics;
mod ocean;
mod output;
mod ripple;

// Re-export all types
pub use caustics::{CausticParams, EdgeMode, MAX_TEXTURE_SIZE};
pub use ocean::{OceanParams, MAX_TILE_SIZE, MIN_TILE_SIZE};
pub use output::OutputConfig;
pub use ripple::{RippleParams, MIN_RIPPLE_GRID};
