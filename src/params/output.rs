//! Headless run and snapshot output configuration.

use std::path::PathBuf;

/// Snapshot recording configuration for headless runs
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Duration to simulate (seconds)
    pub duration_secs: f32,

    /// Frame rate (FPS); one simulation step per frame
    pub fps: u32,

    /// Write a snapshot every N frames (0 = only the final frame)
    pub snapshot_every: usize,

    /// Output directory for snapshots
    pub output_dir: PathBuf,
}

impl OutputConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            fps: 60,
            snapshot_every: 0,
            output_dir: PathBuf::from("snapshots"),
        }
    }

    /// Total number of frames to simulate
    pub fn total_frames(&self) -> usize {
        (self.duration_secs.max(0.0) * self.fps as f32).ceil() as usize
    }

    /// Simulation step per frame (seconds)
    pub fn frame_dt_s(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Whether `frame` (0-based) should be written out
    pub fn is_snapshot_frame(&self, frame: usize) -> bool {
        let last = self.total_frames().saturating_sub(1);
        frame == last || (self.snapshot_every > 0 && frame % self.snapshot_every == 0)
    }

    /// Height snapshot path for a frame
    pub fn heights_path(&self, frame: usize) -> PathBuf {
        self.output_dir.join(format!("heights_{:05}.png", frame))
    }

    /// Caustic snapshot path for a frame
    pub fn caustics_path(&self, frame: usize) -> PathBuf {
        self.output_dir.join(format!("caustics_{:05}.png", frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_frames() {
        let config = OutputConfig::new(2.0);
        assert_eq!(config.total_frames(), 120);
        assert!((config.frame_dt_s() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_snapshot_frames() {
        let mut config = OutputConfig::new(1.0);
        config.fps = 10;
        assert!(!config.is_snapshot_frame(0));
        assert!(config.is_snapshot_frame(9));

        config.snapshot_every = 5;
        assert!(config.is_snapshot_frame(0));
        assert!(config.is_snapshot_frame(5));
        assert!(!config.is_snapshot_frame(6));
    }

    #[test]
    fn test_paths() {
        let config = OutputConfig::new(1.0);
        assert_eq!(
            config.heights_path(7),
            PathBuf::from("snapshots/heights_00007.png")
        );
    }
}
