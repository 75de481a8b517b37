//! Scene controller: owns one surface generator, its clock and the caustics.

use std::error::Error;

use glam::{Vec2, Vec3};
use log::{debug, info, warn};

use super::hooks::ShaderReload;
use super::DrawFlags;
use crate::caustics::CausticProjector;
use crate::error::{ensure_non_negative, ensure_positive, Result};
use crate::grid::Grid;
use crate::params::{CausticParams, EdgeMode, OceanParams, RippleParams};
use crate::ripple::RippleField;
use crate::spectrum::SpectrumField;

enum Surface {
    /// Open ocean driven by a wind spectrum
    Ocean {
        params: OceanParams,
        field: SpectrumField,
    },
    /// Shallow pool driven by taps
    Pool(RippleField),
}

/// High-level water scene with a height field and projected caustics
///
/// Parameter changes that affect the base spectrum rebuild it in place;
/// caustic knobs only retune the projector.
pub struct OceanController {
    surface: Surface,
    caustics: Option<CausticProjector>,
    draw_flags: DrawFlags,
    /// Direction the light travels (toward the water)
    light_dir: Vec3,
    /// Floor to mean surface distance (meters)
    depth_m: f32,
    /// Scene clock; wraps at the animation period for oceans
    time_s: f64,
}

impl OceanController {
    /// Spectral ocean with caustics
    pub fn new(params: OceanParams) -> Result<Self> {
        params.validate()?;

        let field = SpectrumField::new(params.clone())?;
        let caustics = CausticProjector::new(params.caustic_params())?;

        let mut controller = Self {
            depth_m: params.depth_m,
            surface: Surface::Ocean { params, field },
            caustics: Some(caustics),
            draw_flags: DrawFlags::default(),
            light_dir: Vec3::NEG_Y,
            time_s: 0.0,
        };
        controller.refresh_caustics();
        Ok(controller)
    }

    /// Ripple pool without caustics (see [`attach_caustics`](Self::attach_caustics))
    pub fn pool(params: RippleParams) -> Result<Self> {
        let field = RippleField::new(params)?;
        info!(
            "Created {}x{} ripple pool ({} m across)",
            field.params().grid_size,
            field.params().grid_size,
            field.extent_m()
        );

        Ok(Self {
            depth_m: field.params().depth_m,
            surface: Surface::Pool(field),
            caustics: None,
            draw_flags: DrawFlags::default(),
            light_dir: Vec3::NEG_Y,
            time_s: 0.0,
        })
    }

    /// Replace the caustic projector
    ///
    /// Tile length, depth and edge handling always follow the surface; only
    /// the texture and photon settings of `params` are used. On an ocean those
    /// settings are written back into the ocean parameters.
    pub fn attach_caustics(&mut self, params: CausticParams) -> Result<()> {
        let edges = if self.is_pool() {
            EdgeMode::Clamp
        } else {
            EdgeMode::Wrap
        };
        let params = CausticParams {
            tile_length_m: self.tile_length_m(),
            depth_m: self.depth_m,
            edges,
            ..params
        };
        let projector = CausticProjector::new(params.clone())?;

        if let Surface::Ocean { params: ocean, .. } = &mut self.surface {
            ocean.caustic_texture_size = params.texture_size;
            ocean.photon_scale = params.photon_scale;
            ocean.photon_intensity = params.photon_intensity;
            ocean.refractive_index = params.refractive_index;
        }
        self.caustics = Some(projector);
        self.refresh_caustics();
        Ok(())
    }

    /// Advance the scene clock and regenerate the surface
    ///
    /// Negative or non-finite steps are treated as zero. Caustics are refreshed
    /// when enabled and the sea floor is drawn.
    pub fn advance(&mut self, dt_s: f32) -> &Grid<f32> {
        let dt = if dt_s.is_finite() && dt_s >= 0.0 {
            dt_s
        } else {
            debug!("Ignoring time step {}", dt_s);
            0.0
        };

        match &mut self.surface {
            Surface::Ocean { params, field } => {
                self.time_s = (self.time_s + dt as f64).rem_euclid(params.period_s as f64);
                field.advance(self.time_s as f32);
            }
            Surface::Pool(field) => {
                // Oversized steps are truncated, so follow the simulated time
                field.advance(dt);
                self.time_s = field.time_s() as f64;
            }
        }

        self.refresh_caustics();
        self.heights()
    }

    // === Snapshots ===

    pub fn heights(&self) -> &Grid<f32> {
        match &self.surface {
            Surface::Ocean { field, .. } => field.heights(),
            Surface::Pool(field) => field.heights(),
        }
    }

    pub fn slopes(&self) -> &Grid<Vec2> {
        match &self.surface {
            Surface::Ocean { field, .. } => field.slopes(),
            Surface::Pool(field) => field.slopes(),
        }
    }

    /// Horizontal displacement; only oceans with choppiness > 0 have one
    pub fn displacement(&self) -> Option<&Grid<Vec2>> {
        match &self.surface {
            Surface::Ocean { field, .. } => field.displacement(),
            Surface::Pool(_) => None,
        }
    }

    /// Latest complete caustic texture
    pub fn caustics(&self) -> Option<&Grid<f32>> {
        self.caustics.as_ref().map(CausticProjector::texture)
    }

    /// Caustic texture bytes for upload
    pub fn caustic_bytes(&self) -> Option<&[u8]> {
        self.caustics.as_ref().map(CausticProjector::as_bytes)
    }

    /// Scene time (seconds), in `[0, period)` for oceans
    ///
    /// Pools report the time actually simulated.
    pub fn time_s(&self) -> f32 {
        self.time_s as f32
    }

    /// Surface height at a world position (meters above the mean surface)
    pub fn height_at(&self, x_m: f32, z_m: f32) -> f32 {
        match &self.surface {
            Surface::Ocean { field, .. } => field.height_at(x_m, z_m),
            Surface::Pool(field) => field.height_at(x_m, z_m),
        }
    }

    /// World size of one surface tile (meters)
    pub fn tile_length_m(&self) -> f32 {
        match &self.surface {
            Surface::Ocean { params, .. } => params.tile_length_m,
            Surface::Pool(field) => field.extent_m(),
        }
    }

    /// Height of the mean water surface above the floor (meters)
    pub fn depth_m(&self) -> f32 {
        self.depth_m
    }

    /// Ocean parameters (`None` for a pool)
    pub fn params(&self) -> Option<&OceanParams> {
        match &self.surface {
            Surface::Ocean { params, .. } => Some(params),
            Surface::Pool(_) => None,
        }
    }

    pub fn is_pool(&self) -> bool {
        matches!(self.surface, Surface::Pool(_))
    }

    pub fn draw_flags(&self) -> DrawFlags {
        self.draw_flags
    }

    pub fn light_direction(&self) -> Vec3 {
        self.light_dir
    }

    // === Spectrum changes (full rebuild) ===

    pub fn set_wind(&mut self, wind_m_per_s: Vec2) -> Result<()> {
        self.update_ocean("wind", |p| p.wind_m_per_s = wind_m_per_s)
    }

    pub fn set_wave_height(&mut self, wave_height: f32) -> Result<()> {
        self.update_ocean("wave height", |p| p.wave_height = wave_height)
    }

    pub fn set_period(&mut self, period_s: f32) -> Result<()> {
        self.update_ocean("period", |p| p.period_s = period_s)
    }

    /// Also moves the caustic tile so photons land on the same texels
    pub fn set_tile_length(&mut self, tile_length_m: f32) -> Result<()> {
        self.update_ocean("tile length", |p| p.tile_length_m = tile_length_m)
    }

    /// Apply a complete parameter set
    ///
    /// Validates everything first; on error nothing changes. The spectrum is
    /// rebuilt only when a spectrum field differs, the projector only when a
    /// caustic field differs.
    pub fn rebuild(&mut self, params: OceanParams) -> Result<()> {
        params.validate()?;

        let Surface::Ocean {
            params: current,
            field,
        } = &mut self.surface
        else {
            warn!("Ignoring ocean rebuild on a ripple pool");
            return Ok(());
        };

        let caustic_params = params.caustic_params();
        let caustics_changed = current.caustic_params() != caustic_params;

        if current.spectrum_differs(&params) {
            field.rebuild(params.clone())?;
        } else if current.choppiness != params.choppiness {
            field.set_choppiness(params.choppiness)?;
        }

        // A shorter period may leave the clock past the new loop point
        self.time_s = self.time_s.rem_euclid(params.period_s as f64);
        field.advance(self.time_s as f32);

        if caustics_changed || self.caustics.is_none() {
            debug!("Recreating caustic projector");
            self.caustics = Some(CausticProjector::new(caustic_params)?);
        }

        self.depth_m = params.depth_m;
        *current = params;
        self.refresh_caustics();
        Ok(())
    }

    // === Caustic-only changes ===

    pub fn set_depth(&mut self, depth_m: f32) -> Result<()> {
        ensure_positive("depth_m", depth_m)?;
        if let Some(caustics) = self.caustics.as_mut() {
            caustics.set_depth(depth_m)?;
        }
        if let Surface::Ocean { params, .. } = &mut self.surface {
            params.depth_m = depth_m;
        }
        self.depth_m = depth_m;
        self.refresh_caustics();
        Ok(())
    }

    pub fn set_photon_scale(&mut self, photon_scale: f32) -> Result<()> {
        ensure_positive("photon_scale", photon_scale)?;
        let Some(caustics) = self.caustics.as_mut() else {
            warn!("Ignoring photon scale change: no caustics attached");
            return Ok(());
        };
        caustics.set_photon_scale(photon_scale)?;
        if let Surface::Ocean { params, .. } = &mut self.surface {
            params.photon_scale = photon_scale;
        }
        self.refresh_caustics();
        Ok(())
    }

    pub fn set_photon_intensity(&mut self, photon_intensity: f32) -> Result<()> {
        ensure_positive("photon_intensity", photon_intensity)?;
        let Some(caustics) = self.caustics.as_mut() else {
            warn!("Ignoring photon intensity change: no caustics attached");
            return Ok(());
        };
        caustics.set_photon_intensity(photon_intensity)?;
        if let Surface::Ocean { params, .. } = &mut self.surface {
            params.photon_intensity = photon_intensity;
        }
        self.refresh_caustics();
        Ok(())
    }

    // === Other controls ===

    /// Horizontal displacement scale (no spectrum rebuild)
    pub fn set_choppiness(&mut self, choppiness: f32) -> Result<()> {
        ensure_non_negative("choppiness", choppiness)?;
        match &mut self.surface {
            Surface::Ocean { params, field } => {
                field.set_choppiness(choppiness)?;
                params.choppiness = choppiness;
            }
            Surface::Pool(_) => warn!("Ignoring choppiness change on a ripple pool"),
        }
        Ok(())
    }

    /// Disturb a pool at a surface position (meters)
    ///
    /// Returns the cell that will receive the impulse on the next advance.
    /// Spectral oceans ignore taps.
    pub fn tap(&mut self, position_m: Vec2) -> Option<(usize, usize)> {
        match &mut self.surface {
            Surface::Pool(field) => Some(field.tap(position_m)),
            Surface::Ocean { .. } => {
                debug!("Ignoring tap at {:?} on a spectral ocean", position_m);
                None
            }
        }
    }

    pub fn set_draw_flags(&mut self, flags: DrawFlags) {
        self.draw_flags = flags;
    }

    /// Light direction used from the next caustic refresh on
    pub fn set_light_direction(&mut self, light_dir: Vec3) {
        self.light_dir = light_dir;
    }

    /// Ask the render layer to reload its shader programs
    pub fn reload_shaders(
        &self,
        renderer: &mut dyn ShaderReload,
    ) -> std::result::Result<(), Box<dyn Error>> {
        info!("Reloading shaders");
        renderer.reload_shaders()
    }

    fn update_ocean(&mut self, what: &str, change: impl FnOnce(&mut OceanParams)) -> Result<()> {
        let Some(current) = self.params() else {
            warn!("Ignoring {} change on a ripple pool", what);
            return Ok(());
        };
        let mut params = current.clone();
        change(&mut params);
        self.rebuild(params)
    }

    fn refresh_caustics(&mut self) {
        if !self.draw_flags.caustics_active() {
            return;
        }
        let Some(caustics) = self.caustics.as_mut() else {
            return;
        };
        let (heights, slopes) = match &self.surface {
            Surface::Ocean { field, .. } => (field.heights(), field.slopes()),
            Surface::Pool(field) => (field.heights(), field.slopes()),
        };
        caustics.update(heights, slopes, self.light_dir);
    }
}
