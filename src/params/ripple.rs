//! Ripple pool parameters.

use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};

/// Smallest grid that still has an interior cell for the Laplacian.
pub const MIN_RIPPLE_GRID: usize = 3;

/// Ripple pool simulation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RippleParams {
    /// Cells per side
    pub grid_size: usize,

    /// Spacing between cells (meters)
    pub cell_size_m: f32,

    /// Wave propagation speed (meters per second)
    pub wave_speed_m_per_s: f32,

    /// Velocity damping rate (1/s); energy decays roughly as exp(-damping * t)
    pub damping_per_s: f32,

    /// Peak displacement added by one tap (meters)
    pub tap_strength_m: f32,

    /// Gaussian radius of a tap impulse (cells)
    pub tap_radius_cells: f32,

    /// Fraction of the CFL limit used as the largest sub-step (0..=1)
    pub cfl_safety: f32,

    /// Distance from the pool floor to the resting surface (meters)
    pub depth_m: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            grid_size: 128,
            cell_size_m: 1.0,
            wave_speed_m_per_s: 4.0,
            damping_per_s: 1.5,
            tap_strength_m: 1.0,
            tap_radius_cells: 1.5,
            cfl_safety: 0.5,
            depth_m: 30.0,
        }
    }
}

impl RippleParams {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < MIN_RIPPLE_GRID {
            return Err(ConfigError::GridTooSmall {
                size: self.grid_size,
                min: MIN_RIPPLE_GRID,
            });
        }
        ensure_positive("cell_size_m", self.cell_size_m)?;
        ensure_positive("wave_speed_m_per_s", self.wave_speed_m_per_s)?;
        ensure_non_negative("damping_per_s", self.damping_per_s)?;
        ensure_non_negative("tap_strength_m", self.tap_strength_m)?;
        ensure_positive("tap_radius_cells", self.tap_radius_cells)?;
        ensure_positive("cfl_safety", self.cfl_safety)?;
        if self.cfl_safety > 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "cfl_safety",
                value: self.cfl_safety,
                min: 0.0,
                max: 1.0,
            });
        }
        ensure_positive("depth_m", self.depth_m)?;
        Ok(())
    }

    /// Largest stable integration step (seconds)
    ///
    /// Semi-implicit Euler on the five-point Laplacian is stable while
    /// `c * dt / h <= 1 / sqrt(2)`.
    pub fn max_stable_dt_s(&self) -> f32 {
        self.cfl_safety * self.cell_size_m
            / (self.wave_speed_m_per_s * std::f32::consts::SQRT_2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RippleParams::default().validate().is_ok());
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let params = RippleParams {
            grid_size: 2,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::GridTooSmall { size: 2, min: 3 })
        );
    }

    #[test]
    fn test_cfl_safety_above_one_rejected() {
        let params = RippleParams {
            cfl_safety: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::OutOfRange {
                name: "cfl_safety",
                ..
            })
        ));
    }

    #[test]
    fn test_max_stable_dt() {
        let params = RippleParams::default();
        let dt = params.max_stable_dt_s();
        // 0.5 * 1.0 / (4.0 * 1.414) ≈ 0.088s
        assert!((dt - 0.0884).abs() < 1e-3);
    }
}
