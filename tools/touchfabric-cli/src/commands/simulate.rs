//! Generate a synthetic blob replay.

use std::f64::consts::TAU;
use std::path::PathBuf;

use touchfabric_common::config::AppConfig;
use touchfabric_model::blob::RawBlob;
use touchfabric_tracker::writer::FrameWriter;

/// Blob area in square pixels.
const BLOB_AREA: f64 = 400.0;

/// Radians advanced per frame.
const ANGULAR_STEP: f64 = 0.05;

/// `count` blobs circling the frame center, evenly spaced.
fn orbiting_blobs(frame: u64, count: usize, width: f64, height: f64) -> Vec<RawBlob> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = width.min(height) / 3.0;

    (0..count)
        .map(|i| {
            let angle = frame as f64 * ANGULAR_STEP + i as f64 * TAU / count as f64;
            let (sin, cos) = angle.sin_cos();
            RawBlob::new(i as i32, cx + radius * cos, cy + radius * sin, BLOB_AREA).moving(
                -sin,
                cos,
                radius * ANGULAR_STEP,
            )
        })
        .collect()
}

pub fn run(
    output: PathBuf,
    config: &AppConfig,
    frames: u64,
    blobs: usize,
    idle: u64,
) -> anyhow::Result<()> {
    let width = f64::from(config.frames.frame_width);
    let height = f64::from(config.frames.frame_height);

    let comment = format!(
        "synthetic replay: {blobs} orbiting blobs, {frames} frames + {idle} idle, {}x{}, generated {}",
        config.frames.frame_width,
        config.frames.frame_height,
        chrono::Utc::now().to_rfc3339()
    );
    let mut writer = FrameWriter::new(&output, &comment)?;

    for frame in 0..frames {
        writer.write_frame(&orbiting_blobs(frame, blobs, width, height))?;
    }
    for _ in 0..idle {
        writer.write_frame(&[])?;
    }
    writer.flush()?;

    tracing::info!(
        path = %writer.path().display(),
        frames = writer.frames_written(),
        "Wrote replay"
    );
    println!(
        "Wrote {} frames to {}",
        writer.frames_written(),
        writer.path().display()
    );
    Ok(())
}
