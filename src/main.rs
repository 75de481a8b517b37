//! wavefield - headless ocean and pool simulation
//!
//! Steps a spectral ocean (or a tapped ripple pool) at a fixed frame rate and
//! writes grayscale PNG snapshots of the height field and caustic texture.

use std::time::Instant;

use clap::Parser;
use log::info;

use wavefield::cli::Args;
use wavefield::snapshot;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let output = args.output_config();
    let mut controller = args.build_controller()?;
    std::fs::create_dir_all(&output.output_dir)?;

    let frames = output.total_frames();
    let dt_s = output.frame_dt_s();

    println!(
        "wavefield: {} {}x{}",
        if controller.is_pool() { "pool" } else { "ocean" },
        controller.heights().size(),
        controller.heights().size()
    );
    println!("  Frames: {} at {} fps", frames, output.fps);
    println!("  Output: {}", output.output_dir.display());

    let start = Instant::now();
    let mut written = 0;

    for frame in 0..frames {
        controller.advance(dt_s);

        if output.is_snapshot_frame(frame) {
            snapshot::save_heights(controller.heights(), output.heights_path(frame))?;
            if let Some(caustics) = controller.caustics() {
                snapshot::save_intensity(caustics, output.caustics_path(frame))?;
            }
            written += 1;

            let (lo, hi) = controller.heights().min_max();
            info!(
                "Frame {} (t = {:.3} s): heights {:.3}..{:.3} m",
                frame,
                controller.time_s(),
                lo,
                hi
            );
        }
    }

    let elapsed = start.elapsed();
    println!("  Snapshots: {}", written);
    println!("  Time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    Ok(())
}
