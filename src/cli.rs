//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use glam::{Vec2, Vec3};

use crate::error::Result;
use crate::ocean::{DrawFlags, OceanController};
use crate::params::{CausticParams, OceanParams, OutputConfig, RippleParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavefield")]
#[command(about = "Headless spectral ocean and ripple pool with caustic snapshots", long_about = None)]
pub struct Args {
    /// Simulated duration (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 10.0)]
    pub duration: f32,

    /// Simulation steps per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Write snapshots every N frames (0 = final frame only)
    #[arg(long, value_name = "FRAMES", default_value_t = 0)]
    pub snapshot_every: usize,

    /// Directory for PNG snapshots
    #[arg(long, value_name = "DIR", default_value = "snapshots")]
    pub output: PathBuf,

    /// Simulate a ripple pool instead of the open ocean
    #[arg(long)]
    pub pool: bool,

    /// Samples per side (ocean tile size or pool cells)
    #[arg(long, default_value_t = 128)]
    pub size: usize,

    /// World size of the tile or pool (meters)
    #[arg(long, value_name = "METERS", default_value_t = 128.0)]
    pub tile_length: f32,

    /// Wind velocity over the surface (m/s)
    #[arg(long, value_name = "X,Z", value_parser = parse_vec2, default_value = "64,128")]
    pub wind: Vec2,

    /// Phillips spectrum amplitude
    #[arg(long, default_value_t = 3.125e-5)]
    pub wave_height: f32,

    /// Animation loop period (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 10.0)]
    pub period: f32,

    /// Water depth above the floor (meters)
    #[arg(long, value_name = "METERS", default_value_t = 30.0)]
    pub depth: f32,

    /// Horizontal displacement scale (0 = off)
    #[arg(long, default_value_t = 0.0)]
    pub choppiness: f32,

    /// Seed for the spectrum phases
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Caustic texture resolution per side
    #[arg(long, default_value_t = 128)]
    pub caustic_size: usize,

    /// Caustic photon splat radius (texels)
    #[arg(long, default_value_t = 4.0)]
    pub photon_scale: f32,

    /// Caustic photon brightness
    #[arg(long, default_value_t = 2.0)]
    pub photon_intensity: f32,

    /// Direction the light travels
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, default_value = "0,-1,0")]
    pub light: Vec3,

    /// Skip caustic generation
    #[arg(long)]
    pub no_caustics: bool,

    /// Tap the pool at a surface position before the first frame (repeatable)
    #[arg(long = "tap", value_name = "X,Z", value_parser = parse_vec2)]
    pub taps: Vec<Vec2>,
}

impl Args {
    pub fn ocean_params(&self) -> OceanParams {
        OceanParams {
            tile_size: self.size,
            tile_length_m: self.tile_length,
            wave_height: self.wave_height,
            wind_m_per_s: self.wind,
            period_s: self.period,
            seed: self.seed,
            choppiness: self.choppiness,
            depth_m: self.depth,
            caustic_texture_size: self.caustic_size,
            photon_scale: self.photon_scale,
            photon_intensity: self.photon_intensity,
            ..Default::default()
        }
    }

    pub fn ripple_params(&self) -> RippleParams {
        RippleParams {
            grid_size: self.size,
            cell_size_m: self.tile_length / self.size.max(1) as f32,
            depth_m: self.depth,
            ..Default::default()
        }
    }

    pub fn caustic_params(&self) -> CausticParams {
        CausticParams {
            texture_size: self.caustic_size,
            photon_scale: self.photon_scale,
            photon_intensity: self.photon_intensity,
            ..Default::default()
        }
    }

    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            fps: self.fps,
            snapshot_every: self.snapshot_every,
            output_dir: self.output.clone(),
            ..OutputConfig::new(self.duration)
        }
    }

    /// Build the scene described by the arguments, taps queued
    pub fn build_controller(&self) -> Result<OceanController> {
        let mut controller = if self.pool {
            let mut pool = OceanController::pool(self.ripple_params())?;
            if !self.no_caustics {
                pool.attach_caustics(self.caustic_params())?;
            }
            pool
        } else {
            OceanController::new(self.ocean_params())?
        };

        controller.set_light_direction(self.light);
        controller.set_draw_flags(DrawFlags {
            enable_caustics: !self.no_caustics,
            ..Default::default()
        });
        for &position in &self.taps {
            controller.tap(position);
        }
        Ok(controller)
    }
}

fn parse_components<const N: usize>(s: &str) -> std::result::Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {} comma-separated numbers, got '{}'", N, s));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse::<f32>()
            .map_err(|e| format!("invalid number '{}': {}", part, e))?;
    }
    Ok(out)
}

fn parse_vec2(s: &str) -> std::result::Result<Vec2, String> {
    parse_components::<2>(s).map(Vec2::from_array)
}

fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    parse_components::<3>(s).map(Vec3::from_array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::parse_from(["wavefield"]);
        assert_eq!(args.ocean_params(), OceanParams::default());
        assert_eq!(args.light, Vec3::NEG_Y);
        assert!(args.taps.is_empty());
    }

    #[test]
    fn test_vector_arguments() {
        let args = Args::parse_from([
            "wavefield",
            "--wind",
            "10, -5",
            "--light",
            "1,-2,0",
            "--tap",
            "3,4",
            "--tap",
            "5,6",
        ]);
        assert_eq!(args.wind, Vec2::new(10.0, -5.0));
        assert_eq!(args.light, Vec3::new(1.0, -2.0, 0.0));
        assert_eq!(args.taps, vec![Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)]);
    }

    #[test]
    fn test_bad_vector_rejected() {
        assert!(Args::try_parse_from(["wavefield", "--wind", "1"]).is_err());
        assert!(Args::try_parse_from(["wavefield", "--light", "a,b,c"]).is_err());
    }

    #[test]
    fn test_pool_controller_with_taps() {
        let args = Args::parse_from([
            "wavefield",
            "--pool",
            "--size",
            "16",
            "--tile-length",
            "16",
            "--caustic-size",
            "16",
            "--tap",
            "8,8",
        ]);
        let mut pool = args.build_controller().unwrap();
        assert!(pool.is_pool());
        assert!(pool.caustics().is_some());

        pool.advance(0.02);
        assert!(pool.heights().max_abs() > 0.0);
    }

    #[test]
    fn test_no_caustics_flag() {
        let args = Args::parse_from(["wavefield", "--size", "16", "--no-caustics"]);
        let controller = args.build_controller().unwrap();
        assert!(!controller.draw_flags().enable_caustics);
    }

    #[test]
    fn test_output_config() {
        let args = Args::parse_from([
            "wavefield",
            "--duration",
            "2",
            "--fps",
            "30",
            "--output",
            "out",
        ]);
        let output = args.output_config();
        assert_eq!(output.total_frames(), 60);
        assert_eq!(output.output_dir, PathBuf::from("out"));
    }
}
