//! Time-evolved spectral height field (Tessendorf synthesis).

use glam::Vec2;
use log::{debug, info};
use rustfft::num_complex::Complex;
use std::f64::consts::TAU;

use super::fft::InverseFft2d;
use super::phillips::BaseSpectrum;
use crate::error::{ensure_non_negative, Result};
use crate::grid::Grid;
use crate::params::OceanParams;

const ZERO: Complex<f32> = Complex { re: 0.0, im: 0.0 };

/// Read-only snapshot of the most recent surface evaluation
#[derive(Clone, Copy, Debug)]
pub struct SurfaceView<'a> {
    /// Vertical displacement (meters)
    pub heights: &'a Grid<f32>,
    /// Surface gradient `(dh/dx, dh/dz)`
    pub slopes: &'a Grid<Vec2>,
    /// Horizontal displacement (meters), present when choppiness > 0
    pub displacement: Option<&'a Grid<Vec2>>,
    /// World size of the tile (meters)
    pub tile_length_m: f32,
}

/// Spectral ocean tile: cached base spectrum plus per-frame inverse transforms
pub struct SpectrumField {
    params: OceanParams,
    base: BaseSpectrum,
    ifft: InverseFft2d,

    // Per-frame frequency-domain buffers (transformed in place)
    height_spectrum: Vec<Complex<f32>>,
    slope_spectrum: Vec<Complex<f32>>,
    displacement_spectrum: Vec<Complex<f32>>,

    // Spatial outputs
    heights: Grid<f32>,
    slopes: Grid<Vec2>,
    displacement: Grid<Vec2>,

    time_s: f32,
}

impl SpectrumField {
    /// Build the base spectrum and evaluate the surface at `t = 0`
    ///
    /// Fails when the tile size is not a supported power of two, the wind is
    /// zero, or any physical scale is non-positive.
    pub fn new(params: OceanParams) -> Result<Self> {
        validate(&params)?;

        let n = params.tile_size;
        let base = BaseSpectrum::new(&params);
        info!(
            "Built {}x{} spectrum (wind {:?} m/s, tile {} m, period {} s)",
            n, n, params.wind_m_per_s, params.tile_length_m, params.period_s
        );

        let mut field = Self {
            ifft: InverseFft2d::new(n),
            base,
            height_spectrum: vec![ZERO; n * n],
            slope_spectrum: vec![ZERO; n * n],
            displacement_spectrum: vec![ZERO; n * n],
            heights: Grid::new(n),
            slopes: Grid::new(n),
            displacement: Grid::new(n),
            params,
            time_s: 0.0,
        };
        field.advance(0.0);
        Ok(field)
    }

    /// Rebuild the base spectrum from new parameters (expensive, not per frame)
    ///
    /// Buffers and the FFT plan are reused when the tile size is unchanged.
    /// The surface is re-evaluated at the current time, so rebuilding with
    /// identical parameters leaves the output unchanged.
    pub fn rebuild(&mut self, params: OceanParams) -> Result<()> {
        validate(&params)?;

        let n = params.tile_size;
        if n != self.ifft.size() {
            debug!("Resizing spectrum buffers {} -> {}", self.ifft.size(), n);
            self.ifft = InverseFft2d::new(n);
            for buffer in [
                &mut self.height_spectrum,
                &mut self.slope_spectrum,
                &mut self.displacement_spectrum,
            ] {
                buffer.clear();
                buffer.resize(n * n, ZERO);
            }
            self.heights.resize(n);
            self.slopes.resize(n);
            self.displacement.resize(n);
        }

        self.base.rebuild(&params);
        info!(
            "Rebuilt {}x{} spectrum (wind {:?} m/s, wave height {})",
            n, n, params.wind_m_per_s, params.wave_height
        );
        self.params = params;
        self.advance(self.time_s);
        Ok(())
    }

    /// Change the horizontal displacement scale without touching the spectrum
    ///
    /// The surface is re-evaluated at the current time so the displacement
    /// grid matches the heights.
    pub fn set_choppiness(&mut self, choppiness: f32) -> Result<()> {
        ensure_non_negative("choppiness", choppiness)?;
        self.params.choppiness = choppiness;
        self.advance(self.time_s);
        Ok(())
    }

    /// Evaluate the surface at absolute time `time_s`
    ///
    /// Modulates the cached base spectrum by the dispersion phase and runs the
    /// inverse transforms. The height spectrum is Hermitian by construction,
    /// so the result is real and tiles seamlessly.
    pub fn advance(&mut self, time_s: f32) -> SurfaceView<'_> {
        let t = if time_s.is_finite() { time_s } else { 0.0 };
        self.time_s = t;

        let with_displacement = self.params.choppiness > 0.0;
        let base = &self.base;

        for i in 0..base.amplitudes.len() {
            let phase = (base.omega_rad_per_s[i] * t as f64).rem_euclid(TAU) as f32;
            let (sin, cos) = phase.sin_cos();
            let rotor = Complex::new(cos, sin);

            let h0 = base.amplitudes[i];
            let h0_mirror = base.amplitudes[base.mirror_index(i)];
            let h = h0 * rotor + h0_mirror.conj() * rotor.conj();
            self.height_spectrum[i] = h;

            // i*k*h for both axes, packed as (dh/dx) + i*(dh/dz)
            let k = base.wavevectors[i];
            let ih = Complex::new(-h.im, h.re);
            self.slope_spectrum[i] = ih * k.x + Complex::new(-ih.im, ih.re) * k.y;

            if with_displacement {
                let k_len = k.length();
                self.displacement_spectrum[i] = if k_len > 0.0 {
                    // -i*(k/|k|)*h packed as Dx + i*Dz
                    let minus_ih = -ih;
                    minus_ih * (k.x / k_len)
                        + Complex::new(-minus_ih.im, minus_ih.re) * (k.y / k_len)
                } else {
                    ZERO
                };
            }
        }

        self.ifft.process(&mut self.height_spectrum);
        self.ifft.process(&mut self.slope_spectrum);

        for (out, value) in self
            .heights
            .as_mut_slice()
            .iter_mut()
            .zip(&self.height_spectrum)
        {
            *out = value.re;
        }
        for (out, value) in self
            .slopes
            .as_mut_slice()
            .iter_mut()
            .zip(&self.slope_spectrum)
        {
            *out = Vec2::new(value.re, value.im);
        }

        if with_displacement {
            self.ifft.process(&mut self.displacement_spectrum);
            let chop = self.params.choppiness;
            for (out, value) in self
                .displacement
                .as_mut_slice()
                .iter_mut()
                .zip(&self.displacement_spectrum)
            {
                *out = Vec2::new(value.re, value.im) * chop;
            }
        }

        self.view()
    }

    /// Snapshot of the last evaluation
    pub fn view(&self) -> SurfaceView<'_> {
        SurfaceView {
            heights: &self.heights,
            slopes: &self.slopes,
            displacement: (self.params.choppiness > 0.0).then_some(&self.displacement),
            tile_length_m: self.params.tile_length_m,
        }
    }

    pub fn heights(&self) -> &Grid<f32> {
        &self.heights
    }

    pub fn slopes(&self) -> &Grid<Vec2> {
        &self.slopes
    }

    pub fn displacement(&self) -> Option<&Grid<Vec2>> {
        (self.params.choppiness > 0.0).then_some(&self.displacement)
    }

    /// Height at a world position, bilinearly interpolated and tiled
    pub fn height_at(&self, world_x_m: f32, world_z_m: f32) -> f32 {
        let cell = self.params.tile_length_m / self.params.tile_size as f32;
        self.heights.sample_wrapped(world_x_m / cell, world_z_m / cell)
    }

    pub fn params(&self) -> &OceanParams {
        &self.params
    }

    /// Time of the last evaluation (seconds)
    pub fn time_s(&self) -> f32 {
        self.time_s
    }

    pub fn size(&self) -> usize {
        self.params.tile_size
    }
}

fn validate(params: &OceanParams) -> Result<()> {
    params.validate_spectrum()?;
    ensure_non_negative("choppiness", params.choppiness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn scenario_params() -> OceanParams {
        OceanParams {
            tile_size: 64,
            wave_height: 3.125e-5,
            wind_m_per_s: Vec2::new(64.0, 128.0),
            tile_length_m: 64.0,
            period_s: 10.0,
            ..Default::default()
        }
    }

    fn max_abs_diff(a: &Grid<f32>, b: &Grid<f32>) -> f32 {
        a.as_slice()
            .iter()
            .zip(b.as_slice())
            .fold(0.0_f32, |acc, (x, y)| acc.max((x - y).abs()))
    }

    #[test]
    fn test_invalid_construction_fails() {
        let bad_size = OceanParams {
            tile_size: 48,
            ..scenario_params()
        };
        assert!(matches!(
            SpectrumField::new(bad_size),
            Err(ConfigError::UnsupportedTileSize { .. })
        ));

        let no_wind = OceanParams {
            wind_m_per_s: Vec2::ZERO,
            ..scenario_params()
        };
        assert!(matches!(
            SpectrumField::new(no_wind),
            Err(ConfigError::ZeroWind)
        ));

        let no_length = OceanParams {
            tile_length_m: -1.0,
            ..scenario_params()
        };
        assert!(SpectrumField::new(no_length).is_err());
    }

    #[test]
    fn test_surface_is_not_flat() {
        let field = SpectrumField::new(scenario_params()).unwrap();
        assert!(field.heights().max_abs() > 0.0);
        assert!(field.slopes().max_length() > 0.0);
        assert!(field
            .heights()
            .as_slice()
            .iter()
            .all(|h| h.is_finite()));
    }

    #[test]
    fn test_deterministic_for_same_params() {
        let mut a = SpectrumField::new(scenario_params()).unwrap();
        let mut b = SpectrumField::new(scenario_params()).unwrap();

        for t in [0.0, 0.5, 3.25, 7.0] {
            let ha = a.advance(t).heights.clone();
            let hb = b.advance(t).heights.clone();
            assert_eq!(ha, hb);
        }
    }

    #[test]
    fn test_periodic_in_time() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        let start = field.advance(0.0).heights.clone();
        let looped = field.advance(10.0).heights.clone();

        let scale = start.max_abs();
        assert!(scale > 0.0);
        assert!(max_abs_diff(&start, &looped) <= scale * 1e-4);
    }

    #[test]
    fn test_surface_moves_between_frames() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        let start = field.advance(0.0).heights.clone();
        let later = field.advance(2.5).heights.clone();
        assert!(max_abs_diff(&start, &later) > start.max_abs() * 1e-2);
    }

    #[test]
    fn test_inverse_transform_is_real() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        field.advance(1.7);

        let scale = field.heights().max_abs();
        let height_residue = field
            .height_spectrum
            .iter()
            .fold(0.0_f32, |acc, c| acc.max(c.im.abs()));
        assert!(height_residue <= scale * 1e-4);
    }

    #[test]
    fn test_tile_seam_is_continuous() {
        let field = SpectrumField::new(scenario_params()).unwrap();
        let heights = field.heights();
        let n = heights.size();

        let mut interior = 0.0_f32;
        let mut seam = 0.0_f32;
        for z in 0..n {
            for x in 0..n - 1 {
                interior = interior.max((heights.get(x + 1, z) - heights.get(x, z)).abs());
            }
            seam = seam.max((heights.get(0, z) - heights.get(n - 1, z)).abs());
        }
        for x in 0..n {
            seam = seam.max((heights.get(x, 0) - heights.get(x, n - 1)).abs());
        }

        assert!(seam <= interior * 1.5, "seam {} interior {}", seam, interior);
    }

    #[test]
    fn test_rebuild_with_same_params_is_noop() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        let before = field.advance(4.2).heights.clone();

        field.rebuild(scenario_params()).unwrap();
        let after = field.heights().clone();

        assert!(max_abs_diff(&before, &after) <= before.max_abs() * 1e-6);
        assert_eq!(field.time_s(), 4.2);
    }

    #[test]
    fn test_rebuild_changes_size_and_wind() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        let before = field.heights().clone();

        let params = OceanParams {
            tile_size: 32,
            wind_m_per_s: Vec2::new(-30.0, 10.0),
            ..scenario_params()
        };
        field.rebuild(params).unwrap();
        assert_eq!(field.heights().size(), 32);
        assert_eq!(field.slopes().size(), 32);
        assert_ne!(field.heights().size(), before.size());

        // A failed rebuild keeps the previous field
        assert!(field
            .rebuild(OceanParams {
                wind_m_per_s: Vec2::ZERO,
                ..scenario_params()
            })
            .is_err());
        assert_eq!(field.size(), 32);
    }

    #[test]
    fn test_slopes_match_finite_differences() {
        let field = SpectrumField::new(scenario_params()).unwrap();
        let heights = field.heights();
        let slopes = field.slopes();
        let n = heights.size() as isize;
        let cell = 64.0 / n as f32;

        // Central differences approximate the spectral derivative; compare the
        // correlation rather than exact values.
        let mut dot = 0.0_f64;
        let mut norm_a = 0.0_f64;
        let mut norm_b = 0.0_f64;
        for z in 0..n {
            for x in 0..n {
                let fd = (heights.get_wrapped(x + 1, z) - heights.get_wrapped(x - 1, z))
                    / (2.0 * cell);
                let spectral = slopes.get(x as usize, z as usize).x;
                dot += (fd * spectral) as f64;
                norm_a += (fd * fd) as f64;
                norm_b += (spectral * spectral) as f64;
            }
        }
        let correlation = dot / (norm_a.sqrt() * norm_b.sqrt());
        assert!(correlation > 0.9, "correlation {}", correlation);
    }

    #[test]
    fn test_displacement_only_when_choppy() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        assert!(field.view().displacement.is_none());

        field.set_choppiness(1.5).unwrap();
        let view = field.advance(1.0);
        let displacement = view.displacement.expect("displacement requested");
        assert!(displacement.max_length() > 0.0);

        assert!(field.set_choppiness(-1.0).is_err());
    }

    #[test]
    fn test_choppiness_takes_effect_immediately() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        field.advance(2.0);
        let heights = field.heights().clone();

        field.set_choppiness(1.5).unwrap();
        let displacement = field.displacement().unwrap().clone();
        assert!(displacement.max_length() > 0.0);
        assert_eq!(field.heights(), &heights);
        assert_eq!(field.time_s(), 2.0);

        // Toggling off and back on must not expose a stale grid
        field.set_choppiness(0.0).unwrap();
        field.advance(3.0);
        field.set_choppiness(1.5).unwrap();
        let fresh = field.displacement().unwrap();
        assert_ne!(fresh, &displacement);

        field.advance(2.0);
        assert_eq!(field.displacement().unwrap(), &displacement);
    }

    #[test]
    fn test_height_at_matches_grid_samples() {
        let field = SpectrumField::new(scenario_params()).unwrap();
        let heights = field.heights();
        assert!((field.height_at(3.0, 5.0) - heights.get(3, 5)).abs() < 1e-6);
        // One tile over is the same point
        assert!((field.height_at(3.0 + 64.0, 5.0 - 64.0) - heights.get(3, 5)).abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_time_is_clamped() {
        let mut field = SpectrumField::new(scenario_params()).unwrap();
        let view = field.advance(f32::NAN);
        assert!(view.heights.as_slice().iter().all(|h| h.is_finite()));
        assert_eq!(field.time_s(), 0.0);
    }
}
