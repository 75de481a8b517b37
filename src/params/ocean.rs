//! Ocean spectrum and scene parameters.

use glam::Vec2;

use super::caustics::{CausticParams, EdgeMode};
use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};

/// Smallest supported spectrum tile resolution.
pub const MIN_TILE_SIZE: usize = 4;

/// Largest supported spectrum tile resolution.
pub const MAX_TILE_SIZE: usize = 1024;

/// Ocean simulation parameters
///
/// Fields marked "spectrum" feed the base spectrum: changing any of them
/// requires a full rebuild of the spectrum field.
#[derive(Debug, Clone, PartialEq)]
pub struct OceanParams {
    // === Spectrum ===
    /// Grid resolution per tile side (power of two, samples = tile_size²)
    pub tile_size: usize,

    /// Physical side length of one tile (meters)
    pub tile_length_m: f32,

    /// Phillips spectrum amplitude `A` (dimensionless wave height scale)
    pub wave_height: f32,

    /// Wind velocity over the XZ plane (meters per second)
    pub wind_m_per_s: Vec2,

    /// Loop period of the surface animation (seconds)
    pub period_s: f32,

    /// Gravitational acceleration used by the dispersion relation (m/s²)
    pub gravity_m_per_s2: f32,

    /// Small-wave cutoff as a fraction of the largest wind wave length
    pub small_wave_fraction: f32,

    /// Seed for the Gaussian phase draw
    pub seed: u64,

    // === Surface outputs (no rebuild needed) ===
    /// Horizontal displacement scale (0 disables displacement output)
    pub choppiness: f32,

    // === Sea floor / caustics ===
    /// Distance from the sea floor to the mean water surface (meters)
    pub depth_m: f32,

    /// Caustic texture resolution per side
    pub caustic_texture_size: usize,

    /// Photon splat radius (texels)
    pub photon_scale: f32,

    /// Photon brightness multiplier
    pub photon_intensity: f32,

    /// Refractive index of water relative to air
    pub refractive_index: f32,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            tile_size: 128,
            tile_length_m: 128.0, // One meter per sample
            wave_height: 3.125e-5,
            wind_m_per_s: Vec2::new(64.0, 128.0),
            period_s: 10.0,
            gravity_m_per_s2: 9.81,
            small_wave_fraction: 0.001,
            seed: 42,

            choppiness: 0.0,

            depth_m: 30.0,
            caustic_texture_size: 128,
            photon_scale: 4.0,
            photon_intensity: 2.0,
            refractive_index: 1.333,
        }
    }
}

impl OceanParams {
    /// Validate everything the spectrum and caustics depend on.
    pub fn validate(&self) -> Result<()> {
        self.validate_spectrum()?;
        ensure_non_negative("choppiness", self.choppiness)?;
        self.caustic_params().validate()
    }

    /// Validate only the spectrum-affecting fields.
    pub fn validate_spectrum(&self) -> Result<()> {
        if !self.tile_size.is_power_of_two()
            || !(MIN_TILE_SIZE..=MAX_TILE_SIZE).contains(&self.tile_size)
        {
            return Err(ConfigError::UnsupportedTileSize {
                size: self.tile_size,
                min: MIN_TILE_SIZE,
                max: MAX_TILE_SIZE,
            });
        }
        ensure_positive("tile_length_m", self.tile_length_m)?;
        ensure_positive("wave_height", self.wave_height)?;
        ensure_positive("period_s", self.period_s)?;
        ensure_positive("gravity_m_per_s2", self.gravity_m_per_s2)?;
        ensure_non_negative("small_wave_fraction", self.small_wave_fraction)?;

        if !self.wind_m_per_s.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "wind_m_per_s",
                value: self.wind_m_per_s.length(),
            });
        }
        if self.wind_m_per_s.length_squared() == 0.0 {
            return Err(ConfigError::ZeroWind);
        }
        Ok(())
    }

    /// True when `other` would produce a different base spectrum.
    pub fn spectrum_differs(&self, other: &OceanParams) -> bool {
        self.tile_size != other.tile_size
            || self.tile_length_m != other.tile_length_m
            || self.wave_height != other.wave_height
            || self.wind_m_per_s != other.wind_m_per_s
            || self.period_s != other.period_s
            || self.gravity_m_per_s2 != other.gravity_m_per_s2
            || self.small_wave_fraction != other.small_wave_fraction
            || self.seed != other.seed
    }

    /// Caustic projector configuration matching this ocean.
    pub fn caustic_params(&self) -> CausticParams {
        CausticParams {
            depth_m: self.depth_m,
            texture_size: self.caustic_texture_size,
            photon_scale: self.photon_scale,
            photon_intensity: self.photon_intensity,
            tile_length_m: self.tile_length_m,
            refractive_index: self.refractive_index,
            edges: EdgeMode::Wrap,
        }
    }
}
