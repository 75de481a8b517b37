//! Phillips wind-sea spectrum and the cached base amplitudes `h0(k)`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use rustfft::num_complex::Complex;
use std::f64::consts::TAU;

use crate::params::OceanParams;

/// Wavevectors shorter than this carry no energy (avoids 1/k⁴ blowing up)
const MIN_WAVE_NUMBER: f32 = 1e-6;

/// Signed frequency index for FFT-natural ordering (0, 1, .., n/2 - 1, -n/2, .., -1)
#[inline]
pub fn signed_index(index: usize, size: usize) -> isize {
    if index < size / 2 {
        index as isize
    } else {
        index as isize - size as isize
    }
}

/// Wavevector (rad/m) for grid cell `(x, z)` of a tile `length_m` wide
#[inline]
pub fn wavevector(x: usize, z: usize, size: usize, length_m: f32) -> Vec2 {
    let scale = std::f32::consts::TAU / length_m;
    Vec2::new(
        signed_index(x, size) as f32 * scale,
        signed_index(z, size) as f32 * scale,
    )
}

/// Phillips spectrum `P(k)`
///
/// # Arguments
/// * `k` - Wavevector (rad/m)
/// * `wind_dir` - Unit wind direction
/// * `largest_wave_m` - `V² / g`, the longest wave the wind can raise
/// * `cutoff_m` - Waves shorter than this are suppressed
/// * `amplitude` - Phillips constant `A`
pub fn phillips(
    k: Vec2,
    wind_dir: Vec2,
    largest_wave_m: f32,
    cutoff_m: f32,
    amplitude: f32,
) -> f32 {
    let k2 = k.length_squared();
    if k2 < MIN_WAVE_NUMBER * MIN_WAVE_NUMBER {
        return 0.0;
    }

    let alignment = (k / k2.sqrt()).dot(wind_dir);
    let kl2 = k2 * largest_wave_m * largest_wave_m;

    let value = amplitude * (-1.0 / kl2).exp() / (k2 * k2)
        * alignment
        * alignment
        * (-k2 * cutoff_m * cutoff_m).exp();

    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Deep-water dispersion `ω = sqrt(g|k|)`, quantized down to a multiple of `2π / period`
///
/// Quantizing makes every component complete a whole number of cycles per
/// period, so the animation loops seamlessly.
pub fn dispersion(wave_number: f32, gravity: f32, period_s: f32) -> f64 {
    let base = TAU / period_s as f64;
    let omega = (gravity as f64 * wave_number as f64).sqrt();
    (omega / base).floor() * base
}

/// Cached base spectrum: wavevectors, `h0(k)` and angular frequencies
#[derive(Debug, Clone, Default)]
pub struct BaseSpectrum {
    size: usize,
    pub wavevectors: Vec<Vec2>,
    pub amplitudes: Vec<Complex<f32>>,
    pub omega_rad_per_s: Vec<f64>,
}

impl BaseSpectrum {
    /// Build a base spectrum for validated parameters
    pub fn new(params: &OceanParams) -> Self {
        let mut base = Self::default();
        base.rebuild(params);
        base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Recompute every coefficient in place, reusing the allocations
    ///
    /// Each cell consumes two normal draws in row-major order, so a given seed
    /// always maps to the same surface.
    pub fn rebuild(&mut self, params: &OceanParams) {
        let n = params.tile_size;
        let count = n * n;
        self.size = n;

        self.wavevectors.clear();
        self.amplitudes.clear();
        self.omega_rad_per_s.clear();
        self.wavevectors.reserve(count);
        self.amplitudes.reserve(count);
        self.omega_rad_per_s.reserve(count);

        let wind_speed = params.wind_m_per_s.length();
        let wind_dir = params.wind_m_per_s / wind_speed;
        let largest_wave_m = wind_speed * wind_speed / params.gravity_m_per_s2;
        let cutoff_m = largest_wave_m * params.small_wave_fraction;

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

        for z in 0..n {
            for x in 0..n {
                let xi_r: f32 = rng.sample(StandardNormal);
                let xi_i: f32 = rng.sample(StandardNormal);

                let k = wavevector(x, z, n, params.tile_length_m);
                self.wavevectors.push(k);
                self.omega_rad_per_s.push(dispersion(
                    k.length(),
                    params.gravity_m_per_s2,
                    params.period_s,
                ));

                // The Nyquist row/column has no partner at -k; leaving it empty
                // keeps height, slope and displacement spectra Hermitian.
                if x == n / 2 || z == n / 2 {
                    self.amplitudes.push(Complex::new(0.0, 0.0));
                    continue;
                }

                let p = phillips(
                    k,
                    wind_dir,
                    largest_wave_m,
                    cutoff_m,
                    params.wave_height,
                );
                let scale = (p * 0.5).sqrt();
                self.amplitudes.push(Complex::new(xi_r * scale, xi_i * scale));
            }
        }
    }

    /// Index of the cell holding `-k` for cell `index`
    #[inline]
    pub fn mirror_index(&self, index: usize) -> usize {
        let n = self.size;
        let (x, z) = (index % n, index / n);
        ((n - z) % n) * n + (n - x) % n
    }
}
