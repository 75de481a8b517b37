//! Caustic projector parameters.

use crate::error::{ensure_positive, ConfigError, Result};

/// Largest supported caustic texture resolution per side.
pub const MAX_TEXTURE_SIZE: usize = 4096;

/// How photons leaving the texture are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Tileable surface: photons re-enter on the opposite side
    #[default]
    Wrap,
    /// Bounded surface (pool): photons past the rim are lost
    Clamp,
}

/// Caustic projection parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CausticParams {
    /// Distance from the floor plane to the mean water surface (meters)
    pub depth_m: f32,

    /// Output texture resolution per side
    pub texture_size: usize,

    /// Photon splat radius (texels); larger values give softer caustics
    pub photon_scale: f32,

    /// Photon brightness multiplier
    pub photon_intensity: f32,

    /// World size covered by one texture tile (meters)
    pub tile_length_m: f32,

    /// Refractive index of water relative to air
    pub refractive_index: f32,

    /// Edge handling for photon deposits and the blur
    pub edges: EdgeMode,
}

impl Default for CausticParams {
    fn default() -> Self {
        Self {
            depth_m: 30.0,
            texture_size: 128,
            photon_scale: 4.0,
            photon_intensity: 2.0,
            tile_length_m: 128.0,
            refractive_index: 1.333,
            edges: EdgeMode::Wrap,
        }
    }
}

impl CausticParams {
    pub fn validate(&self) -> Result<()> {
        if self.texture_size == 0 || self.texture_size > MAX_TEXTURE_SIZE {
            return Err(ConfigError::UnsupportedTextureSize {
                size: self.texture_size,
                max: MAX_TEXTURE_SIZE,
            });
        }
        ensure_positive("depth_m", self.depth_m)?;
        ensure_positive("photon_scale", self.photon_scale)?;
        ensure_positive("photon_intensity", self.photon_intensity)?;
        ensure_positive("tile_length_m", self.tile_length_m)?;
        ensure_positive("refractive_index", self.refractive_index)?;
        Ok(())
    }

    /// World size of one texel (meters)
    pub fn texel_size_m(&self) -> f32 {
        self.tile_length_m / self.texture_size as f32
    }
}
