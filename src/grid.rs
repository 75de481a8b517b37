//! Square sample grids shared by the height-field generators and caustics.

use glam::Vec2;

/// Square grid of samples stored row-major (`z * size + x`).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Create a `size` x `size` grid filled with `T::default()`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }

    /// Samples per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sample at grid position. Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> T {
        debug_assert!(x < self.size && z < self.size);
        self.cells[z * self.size + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: T) {
        debug_assert!(x < self.size && z < self.size);
        self.cells[z * self.size + x] = value;
    }

    /// Sample at a signed position, wrapping around the tile edges.
    #[inline]
    pub fn get_wrapped(&self, x: isize, z: isize) -> T {
        let n = self.size as isize;
        self.get(x.rem_euclid(n) as usize, z.rem_euclid(n) as usize)
    }

    /// One row of samples (constant `z`).
    pub fn row(&self, z: usize) -> &[T] {
        &self.cells[z * self.size..(z + 1) * self.size]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Change the side length, keeping the allocation when it is large enough.
    ///
    /// Contents are reset to `T::default()`.
    pub fn resize(&mut self, size: usize) {
        self.size = size;
        self.cells.clear();
        self.cells.resize(size * size, T::default());
    }
}

impl Grid<f32> {
    /// Largest absolute sample value (0 for an empty grid).
    pub fn max_abs(&self) -> f32 {
        self.cells.iter().fold(0.0_f32, |acc, v| acc.max(v.abs()))
    }

    /// Minimum and maximum sample values.
    pub fn min_max(&self) -> (f32, f32) {
        self.cells
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Bilinear sample at fractional cell coordinates, wrapping across tiles.
    pub fn sample_wrapped(&self, x: f32, z: f32) -> f32 {
        if self.size == 0 || !x.is_finite() || !z.is_finite() {
            return 0.0;
        }
        let x0 = x.floor();
        let z0 = z.floor();
        let fx = x - x0;
        let fz = z - z0;
        let (ix, iz) = (x0 as isize, z0 as isize);

        let h00 = self.get_wrapped(ix, iz);
        let h10 = self.get_wrapped(ix + 1, iz);
        let h01 = self.get_wrapped(ix, iz + 1);
        let h11 = self.get_wrapped(ix + 1, iz + 1);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fz
    }

    /// Bilinear sample at fractional cell coordinates, clamped to the edges.
    pub fn sample_clamped(&self, x: f32, z: f32) -> f32 {
        if self.size == 0 || !x.is_finite() || !z.is_finite() {
            return 0.0;
        }
        let max = (self.size - 1) as f32;
        let x = x.clamp(0.0, max);
        let z = z.clamp(0.0, max);
        let (x0, z0) = (x.floor() as usize, z.floor() as usize);
        let (x1, z1) = ((x0 + 1).min(self.size - 1), (z0 + 1).min(self.size - 1));
        let (fx, fz) = (x - x0 as f32, z - z0 as f32);

        let top = self.get(x0, z0) + (self.get(x1, z0) - self.get(x0, z0)) * fx;
        let bottom = self.get(x0, z1) + (self.get(x1, z1) - self.get(x0, z1)) * fx;
        top + (bottom - top) * fz
    }
}

impl Grid<Vec2> {
    /// Largest vector length in the grid.
    pub fn max_length(&self) -> f32 {
        self.cells.iter().fold(0.0_f32, |acc, v| acc.max(v.length()))
    }
}
