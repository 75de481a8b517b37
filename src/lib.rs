//! Wavefield - tileable water height fields with projected caustics
//!
//! A spectral ocean (statistical wave synthesis driven by wind) or a tapped
//! ripple pool produces a height field every frame; the caustic projector
//! turns that surface into a light pattern on the floor below.

pub mod caustics;
pub mod cli;
pub mod error;
pub mod grid;
pub mod ocean;
pub mod params;
pub mod ripple;
pub mod snapshot;
pub mod spectrum;

pub use caustics::CausticProjector;
pub use error::{ConfigError, Result};
pub use grid::Grid;
pub use ocean::{DrawFlags, OceanController, ShaderReload};
pub use params::{CausticParams, EdgeMode, OceanParams, OutputConfig, RippleParams};
pub use ripple::RippleField;
pub use spectrum::{SpectrumField, SurfaceView};
