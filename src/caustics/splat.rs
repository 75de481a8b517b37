//! Photon splatting: bilinear deposit plus a normalized separable blur.
//!
//! On a wrapped tile both stages conserve the total deposited energy, so the
//! blurred density can be compared against the flat-water baseline.

use crate::grid::Grid;
use crate::params::EdgeMode;

/// Largest blur radius in texels
pub const MAX_BLUR_RADIUS: usize = 64;

/// Normalized 1D Gaussian weights for the separable blur
#[derive(Debug, Clone, PartialEq)]
pub struct BlurKernel {
    radius: usize,
    weights: Vec<f32>,
}

impl BlurKernel {
    /// Kernel whose radius is `photon_scale` texels (sigma = radius / 2)
    pub fn new(photon_scale: f32) -> Self {
        let scale = if photon_scale.is_finite() {
            photon_scale.max(0.0)
        } else {
            0.0
        };
        let radius = (scale.ceil() as usize).min(MAX_BLUR_RADIUS);
        let sigma = (scale * 0.5).max(0.5);

        let mut weights: Vec<f32> = (0..=2 * radius)
            .map(|i| {
                let d = i as f32 - radius as f32;
                (-d * d / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        let total: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }

        Self { radius, weights }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Deposit `energy` at fractional texel coordinates, split over the four
/// nearest texels
///
/// With [`EdgeMode::Wrap`] the deposit wraps across the tile; with
/// [`EdgeMode::Clamp`] the share landing outside the texture is dropped.
pub fn deposit_bilinear(target: &mut Grid<f32>, u: f32, v: f32, energy: f32, edges: EdgeMode) {
    if !u.is_finite() || !v.is_finite() || !energy.is_finite() || target.is_empty() {
        return;
    }
    let n = target.size() as isize;
    let (u0, v0) = (u.floor(), v.floor());
    let (fu, fv) = (u - u0, v - v0);
    let (x0, z0) = (u0 as isize, v0 as isize);

    let mut add = |x: isize, z: isize, w: f32| {
        let (x, z) = match edges {
            EdgeMode::Wrap => (x.rem_euclid(n), z.rem_euclid(n)),
            EdgeMode::Clamp if x < 0 || z < 0 || x >= n || z >= n => return,
            EdgeMode::Clamp => (x, z),
        };
        let (x, z) = (x as usize, z as usize);
        let value = target.get(x, z) + energy * w;
        target.set(x, z, value);
    };
    add(x0, z0, (1.0 - fu) * (1.0 - fv));
    add(x0 + 1, z0, fu * (1.0 - fv));
    add(x0, z0 + 1, (1.0 - fu) * fv);
    add(x0 + 1, z0 + 1, fu * fv);
}

/// Separable blur: `data` -> `scratch` (rows) -> `data` (columns)
///
/// Wrapped edges read across the tile; clamped edges repeat the border texel.
pub fn blur(data: &mut Grid<f32>, scratch: &mut Grid<f32>, kernel: &BlurKernel, edges: EdgeMode) {
    let n = data.size();
    if kernel.radius == 0 || n == 0 {
        return;
    }
    if scratch.size() != n {
        scratch.resize(n);
    }
    let r = kernel.radius as isize;
    let last = n as isize - 1;
    let sample = |grid: &Grid<f32>, x: isize, z: isize| match edges {
        EdgeMode::Wrap => grid.get_wrapped(x, z),
        EdgeMode::Clamp => grid.get(x.clamp(0, last) as usize, z.clamp(0, last) as usize),
    };

    for z in 0..n {
        for x in 0..n {
            let mut sum = 0.0;
            for (i, w) in kernel.weights.iter().enumerate() {
                sum += w * sample(data, x as isize + i as isize - r, z as isize);
            }
            scratch.set(x, z, sum);
        }
    }

    for z in 0..n {
        for x in 0..n {
            let mut sum = 0.0;
            for (i, w) in kernel.weights.iter().enumerate() {
                sum += w * sample(scratch, x as isize, z as isize + i as isize - r);
            }
            data.set(x, z, sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(grid: &Grid<f32>) -> f32 {
        grid.as_slice().iter().sum()
    }

    #[test]
    fn test_kernel_is_normalized() {
        for scale in [0.5, 1.0, 4.0, 9.3] {
            let kernel = BlurKernel::new(scale);
            let sum: f32 = kernel.weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            assert_eq!(kernel.weights().len(), 2 * kernel.radius() + 1);
        }
    }

    #[test]
    fn test_kernel_radius_follows_scale() {
        assert_eq!(BlurKernel::new(4.0).radius(), 4);
        assert_eq!(BlurKernel::new(0.0).radius(), 0);
        assert_eq!(BlurKernel::new(1e9).radius(), MAX_BLUR_RADIUS);
        assert_eq!(BlurKernel::new(f32::NAN).radius(), 0);
    }

    #[test]
    fn test_bilinear_deposit_conserves_energy() {
        let mut grid = Grid::new(4);
        deposit_bilinear(&mut grid, 1.25, 2.5, 2.0, EdgeMode::Wrap);
        deposit_bilinear(&mut grid, -0.5, 3.75, 1.0, EdgeMode::Wrap); // wraps on both axes
        assert!((total(&grid) - 3.0).abs() < 1e-6);
        assert!((grid.get(1, 2) - 2.0 * 0.75 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_deposit_is_dropped() {
        let mut grid = Grid::new(4);
        deposit_bilinear(&mut grid, f32::NAN, 1.0, 1.0, EdgeMode::Wrap);
        deposit_bilinear(&mut grid, 1.0, 1.0, f32::INFINITY, EdgeMode::Clamp);
        assert_eq!(total(&grid), 0.0);
    }

    #[test]
    fn test_blur_conserves_energy_and_spreads() {
        let mut grid = Grid::new(16);
        let mut scratch = Grid::new(16);
        grid.set(0, 0, 10.0);

        blur(&mut grid, &mut scratch, &BlurKernel::new(3.0), EdgeMode::Wrap);

        assert!((total(&grid) - 10.0).abs() < 1e-4);
        assert!(grid.get(0, 0) < 10.0);
        // Spread wraps to the far side of the tile
        assert!(grid.get(15, 15) > 0.0);
        assert!((grid.get(1, 0) - grid.get(15, 0)).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_deposit_drops_outside_share() {
        let mut grid = Grid::new(4);
        // Half the photon lands past the right edge
        deposit_bilinear(&mut grid, 3.5, 1.0, 2.0, EdgeMode::Clamp);
        assert!((grid.get(3, 1) - 1.0).abs() < 1e-6);
        assert_eq!(grid.get(0, 1), 0.0);
        assert!((total(&grid) - 1.0).abs() < 1e-6);

        deposit_bilinear(&mut grid, -3.0, 1.0, 1.0, EdgeMode::Clamp);
        assert!((total(&grid) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_blur_does_not_cross_edges() {
        let mut grid = Grid::new(16);
        let mut scratch = Grid::new(16);
        grid.set(0, 8, 10.0);

        blur(&mut grid, &mut scratch, &BlurKernel::new(3.0), EdgeMode::Clamp);

        assert!(grid.get(1, 8) > 0.0);
        assert_eq!(grid.get(15, 8), 0.0);
    }

    #[test]
    fn test_clamped_blur_keeps_uniform_field() {
        let mut grid = Grid::new(8);
        let mut scratch = Grid::new(8);
        grid.fill(2.0);

        blur(&mut grid, &mut scratch, &BlurKernel::new(4.0), EdgeMode::Clamp);
        assert!(grid.as_slice().iter().all(|v| (v - 2.0).abs() < 1e-5));
    }
}
