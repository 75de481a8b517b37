//! Caustic texture generation from a height field.
//!
//! Every surface sample emits one photon: the light ray is refracted through
//! the local surface normal and traced to the floor plane, where the photon is
//! splatted into an accumulation texture. The blurred density is compared with
//! what flat water would produce and tone-mapped into `[0, 1)`.

use glam::{Vec2, Vec3};
use log::{debug, warn};

use super::refract::{floor_hit, incident_direction, refract, surface_normal};
use super::splat::{blur, deposit_bilinear, BlurKernel};
use crate::error::{ensure_positive, Result};
use crate::grid::Grid;
use crate::params::CausticParams;

/// Projects refracted light onto the sea floor
///
/// Double-buffered: `update` accumulates into private buffers and swaps the
/// finished texture in, so `texture()` always returns a complete frame.
pub struct CausticProjector {
    params: CausticParams,
    kernel: BlurKernel,

    front: Grid<f32>,
    back: Grid<f32>,
    accum: Grid<f32>,
    scratch: Grid<f32>,
}

impl CausticProjector {
    pub fn new(params: CausticParams) -> Result<Self> {
        params.validate()?;

        let t = params.texture_size;
        debug!(
            "Caustic projector {}x{} (depth {} m, photon scale {})",
            t, t, params.depth_m, params.photon_scale
        );

        Ok(Self {
            kernel: BlurKernel::new(params.photon_scale),
            front: Grid::new(t),
            back: Grid::new(t),
            accum: Grid::new(t),
            scratch: Grid::new(t),
            params,
        })
    }

    /// Recompute the caustic texture from the current surface
    ///
    /// `heights` and `slopes` must share a resolution; they cover one tile of
    /// `tile_length_m`. `light_dir` points from the light toward the water.
    /// Mismatched inputs keep the previous texture.
    pub fn update(
        &mut self,
        heights: &Grid<f32>,
        slopes: &Grid<Vec2>,
        light_dir: Vec3,
    ) -> &Grid<f32> {
        let n = heights.size();
        if n == 0 || slopes.size() != n {
            warn!(
                "Caustic update skipped: heights {}x{}, slopes {}x{}",
                n,
                n,
                slopes.size(),
                slopes.size()
            );
            return &self.front;
        }

        let cell_m = self.params.tile_length_m / n as f32;
        let texel_m = self.params.texel_size_m();
        let depth_m = self.params.depth_m;
        let eta = 1.0 / self.params.refractive_index;
        let incident = incident_direction(light_dir);
        let edges = self.params.edges;

        self.accum.fill(0.0);
        for z in 0..n {
            for x in 0..n {
                let h = heights.get(x, z);
                let slope = slopes.get(x, z);
                if !h.is_finite() || !slope.is_finite() {
                    continue;
                }

                let origin = Vec3::new(x as f32 * cell_m, depth_m + h, z as f32 * cell_m);
                let dir = refract(incident, surface_normal(slope), eta);
                let hit = floor_hit(origin, dir);
                deposit_bilinear(&mut self.accum, hit.x / texel_m, hit.y / texel_m, 1.0, edges);
            }
        }

        blur(&mut self.accum, &mut self.scratch, &self.kernel, edges);

        // Photons per texel if the water were flat
        let t = self.params.texture_size;
        let baseline = (n * n) as f32 / (t * t) as f32;
        let exposure = self.params.photon_intensity * 0.5 / baseline;
        for (out, &density) in self
            .back
            .as_mut_slice()
            .iter_mut()
            .zip(self.accum.as_slice())
        {
            let value = 1.0 - (-exposure * density.max(0.0)).exp();
            *out = if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            };
        }

        std::mem::swap(&mut self.front, &mut self.back);
        &self.front
    }

    /// Move the floor plane; takes effect on the next update
    pub fn set_depth(&mut self, depth_m: f32) -> Result<()> {
        ensure_positive("depth_m", depth_m)?;
        self.params.depth_m = depth_m;
        Ok(())
    }

    /// Change the splat radius (rebuilds the blur kernel only)
    pub fn set_photon_scale(&mut self, photon_scale: f32) -> Result<()> {
        ensure_positive("photon_scale", photon_scale)?;
        self.params.photon_scale = photon_scale;
        self.kernel = BlurKernel::new(photon_scale);
        Ok(())
    }

    pub fn set_photon_intensity(&mut self, photon_intensity: f32) -> Result<()> {
        ensure_positive("photon_intensity", photon_intensity)?;
        self.params.photon_intensity = photon_intensity;
        Ok(())
    }

    /// World size covered by the texture (follows the surface tile)
    pub fn set_tile_length(&mut self, tile_length_m: f32) -> Result<()> {
        ensure_positive("tile_length_m", tile_length_m)?;
        self.params.tile_length_m = tile_length_m;
        Ok(())
    }

    /// Most recent complete caustic texture, intensities in `[0, 1]`
    pub fn texture(&self) -> &Grid<f32> {
        &self.front
    }

    /// Raw bytes of the front buffer (native-endian `f32`), for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.front.as_slice())
    }

    pub fn params(&self) -> &CausticParams {
        &self.params
    }
}
