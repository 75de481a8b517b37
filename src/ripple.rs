//! Ripple pool: a damped wave equation driven by tap impulses.
//!
//! The pool rim is pinned (displacement zero just outside the grid), so every
//! mode oscillates and the surface settles back to rest once taps stop.

use glam::Vec2;
use log::debug;

use crate::error::Result;
use crate::grid::Grid;
use crate::params::RippleParams;

/// Upper bound on sub-steps per `advance`; time beyond this is dropped
pub const MAX_SUBSTEPS: usize = 256;

/// Height field generator driven by discrete taps
pub struct RippleField {
    params: RippleParams,
    displacement: Grid<f32>,
    velocity: Grid<f32>,
    slopes: Grid<Vec2>,
    /// Scratch buffer for the Laplacian of the current step
    laplacian: Vec<f32>,
    /// Taps waiting for the next `advance`
    pending_taps: Vec<(usize, usize)>,
    time_s: f32,
}

impl RippleField {
    /// Create a pool at rest
    pub fn new(params: RippleParams) -> Result<Self> {
        params.validate()?;
        let n = params.grid_size;

        Ok(Self {
            displacement: Grid::new(n),
            velocity: Grid::new(n),
            slopes: Grid::new(n),
            laplacian: vec![0.0; n * n],
            pending_taps: Vec::new(),
            params,
            time_s: 0.0,
        })
    }

    /// Queue an impulse at the cell nearest `position_m` (surface space, meters)
    ///
    /// Out-of-range positions are clamped to the nearest edge cell. Returns the
    /// cell that will receive the impulse.
    pub fn tap(&mut self, position_m: Vec2) -> (usize, usize) {
        let cell = self.nearest_cell(position_m);
        self.pending_taps.push(cell);
        cell
    }

    /// Grid cell nearest a surface-space position, clamped into the grid
    pub fn nearest_cell(&self, position_m: Vec2) -> (usize, usize) {
        let max = (self.params.grid_size - 1) as f32;
        // NaN survives clamp but saturates to 0 in the cast
        let to_cell = |v: f32| (v / self.params.cell_size_m).round().clamp(0.0, max) as usize;
        (to_cell(position_m.x), to_cell(position_m.y))
    }

    /// Apply pending taps, then integrate the wave equation over `dt_s`
    ///
    /// Steps larger than the stability limit are split into equal sub-steps.
    /// Negative or non-finite `dt_s` only applies the taps.
    pub fn advance(&mut self, dt_s: f32) -> &Grid<f32> {
        self.apply_taps();

        let dt = if dt_s.is_finite() && dt_s > 0.0 {
            dt_s
        } else {
            0.0
        };

        if dt > 0.0 {
            let max_dt = self.params.max_stable_dt_s();
            let mut steps = (dt / max_dt).ceil().max(1.0) as usize;
            let mut simulated = dt;
            if steps > MAX_SUBSTEPS {
                steps = MAX_SUBSTEPS;
                simulated = max_dt * MAX_SUBSTEPS as f32;
                debug!(
                    "Ripple step of {:.3}s truncated to {:.3}s ({} sub-steps)",
                    dt, simulated, steps
                );
            }

            let h = simulated / steps as f32;
            for _ in 0..steps {
                self.step(h);
            }
            self.time_s += simulated;
        }

        self.update_slopes();
        &self.displacement
    }

    /// One semi-implicit Euler step of `u_tt = c² ∇²u - γ u_t`
    fn step(&mut self, h: f32) {
        let n = self.params.grid_size;
        let c = self.params.wave_speed_m_per_s / self.params.cell_size_m;
        let c2 = c * c;
        let decay = (-self.params.damping_per_s * h).exp();

        let u = &self.displacement;
        for z in 0..n {
            for x in 0..n {
                let center = u.get(x, z);
                let neighbors = self.neighbor(x as isize - 1, z as isize)
                    + self.neighbor(x as isize + 1, z as isize)
                    + self.neighbor(x as isize, z as isize - 1)
                    + self.neighbor(x as isize, z as isize + 1);
                self.laplacian[z * n + x] = neighbors - 4.0 * center;
            }
        }

        let velocity = self.velocity.as_mut_slice();
        let displacement = self.displacement.as_mut_slice();
        for ((v, u), lap) in velocity
            .iter_mut()
            .zip(displacement.iter_mut())
            .zip(&self.laplacian)
        {
            *v = (*v + h * c2 * lap) * decay;
            *u += h * *v;
        }
    }

    /// Displacement with the pinned rim outside the grid
    #[inline]
    fn neighbor(&self, x: isize, z: isize) -> f32 {
        let n = self.params.grid_size as isize;
        if x < 0 || z < 0 || x >= n || z >= n {
            0.0
        } else {
            self.displacement.get(x as usize, z as usize)
        }
    }

    /// Add a Gaussian bump for every queued tap
    fn apply_taps(&mut self) {
        if self.pending_taps.is_empty() {
            return;
        }

        let n = self.params.grid_size as isize;
        let radius = self.params.tap_radius_cells;
        let reach = (2.0 * radius).ceil() as isize;
        let strength = self.params.tap_strength_m;

        for (cx, cz) in std::mem::take(&mut self.pending_taps) {
            for dz in -reach..=reach {
                for dx in -reach..=reach {
                    let (x, z) = (cx as isize + dx, cz as isize + dz);
                    if x < 0 || z < 0 || x >= n || z >= n {
                        continue;
                    }
                    let d2 = (dx * dx + dz * dz) as f32;
                    if d2 > 4.0 * radius * radius {
                        continue;
                    }
                    let weight = (-d2 / (radius * radius)).exp();
                    let (x, z) = (x as usize, z as usize);
                    let value = self.displacement.get(x, z) + strength * weight;
                    self.displacement.set(x, z, value);
                }
            }
        }
    }

    fn update_slopes(&mut self) {
        let n = self.params.grid_size;
        let inv = 1.0 / (2.0 * self.params.cell_size_m);
        for z in 0..n {
            for x in 0..n {
                let (xi, zi) = (x as isize, z as isize);
                let dx = self.neighbor(xi + 1, zi) - self.neighbor(xi - 1, zi);
                let dz = self.neighbor(xi, zi + 1) - self.neighbor(xi, zi - 1);
                self.slopes.set(x, z, Vec2::new(dx, dz) * inv);
            }
        }
    }

    /// Discrete wave energy: kinetic plus gradient (potential) terms
    pub fn energy(&self) -> f32 {
        let n = self.params.grid_size as isize;
        let c = self.params.wave_speed_m_per_s / self.params.cell_size_m;

        let kinetic: f32 = self.velocity.as_slice().iter().map(|v| v * v).sum();

        // Every edge counted once, including edges to the pinned rim
        let mut potential = 0.0_f32;
        for z in -1..n {
            for x in -1..n {
                let here = self.neighbor(x, z);
                if z >= 0 {
                    let d = self.neighbor(x + 1, z) - here;
                    potential += d * d;
                }
                if x >= 0 {
                    let d = self.neighbor(x, z + 1) - here;
                    potential += d * d;
                }
            }
        }

        0.5 * kinetic + 0.5 * c * c * potential
    }

    /// Return to rest and drop pending taps
    pub fn reset(&mut self) {
        self.displacement.fill(0.0);
        self.velocity.fill(0.0);
        self.slopes.fill(Vec2::ZERO);
        self.pending_taps.clear();
        self.time_s = 0.0;
    }

    pub fn heights(&self) -> &Grid<f32> {
        &self.displacement
    }

    /// Central-difference gradient `(du/dx, du/dz)` from the last advance
    pub fn slopes(&self) -> &Grid<Vec2> {
        &self.slopes
    }

    /// Displacement at a surface position, clamped to the pool
    pub fn height_at(&self, x_m: f32, z_m: f32) -> f32 {
        let cell = self.params.cell_size_m;
        self.displacement.sample_clamped(x_m / cell, z_m / cell)
    }

    pub fn pending_taps(&self) -> usize {
        self.pending_taps.len()
    }

    pub fn params(&self) -> &RippleParams {
        &self.params
    }

    pub fn time_s(&self) -> f32 {
        self.time_s
    }

    /// World size of the pool (meters)
    pub fn extent_m(&self) -> f32 {
        self.params.grid_size as f32 * self.params.cell_size_m
    }
}
