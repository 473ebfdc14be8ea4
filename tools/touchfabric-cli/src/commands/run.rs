//! Run the frame loop.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use touchfabric_common::config::AppConfig;
use touchfabric_dispatch::{BatchDispatcher, NullTransport, OscUdpTransport, Transport};
use touchfabric_engine::{Command, DriverOptions, FrameConfig, FrameDriver};
use touchfabric_model::area::ActiveArea;
use touchfabric_tracker::backends::open_tracker;

/// Seconds between throughput log lines.
const STATS_INTERVAL_SECS: u64 = 10;

fn open_transport(config: &AppConfig) -> Box<dyn Transport> {
    match OscUdpTransport::from_config(&config.network) {
        Ok(transport) => Box::new(transport),
        Err(e) => {
            tracing::warn!(
                error = %e,
                host = %config.network.host,
                port = config.network.port,
                "Cannot reach listener, touches will be discarded"
            );
            Box::new(NullTransport)
        }
    }
}

pub async fn run(
    config: AppConfig,
    replay: Option<PathBuf>,
    looping: bool,
    max_frames: Option<u64>,
) -> anyhow::Result<()> {
    config.validate()?;

    let tracker = open_tracker(replay.as_deref(), looping);
    let dispatcher = BatchDispatcher::new(
        open_transport(&config),
        config.network.address.clone(),
        config.frames.batch_size,
    );
    let area = ActiveArea::load_or_empty(&config.area.file);

    let mut driver = FrameDriver::new(tracker, dispatcher, area, DriverOptions::from_app(&config));
    driver.setup()?;
    let mut frame_config = FrameConfig::from_app(&config);

    let fps = config.frames.fps.max(1);
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let stats_every = u64::from(fps) * STATS_INTERVAL_SECS;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(
        fps,
        edit_mode = frame_config.edit_mode,
        play_mode = frame_config.play_mode,
        "Running; type commands on stdin, Ctrl+C to stop"
    );

    let mut touches_seen: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = driver.tick(&frame_config);
                touches_seen += report.touches as u64;

                if report.frame % stats_every == 0 {
                    tracing::info!(
                        frame = report.frame,
                        fps = %format_args!("{:.1}", driver.clock().average_fps()),
                        touches = touches_seen,
                        messages = driver.dispatcher().messages_sent(),
                        failures = driver.dispatcher().send_failures(),
                        "Frame loop stats"
                    );
                }
                if max_frames.is_some_and(|max| report.frame >= max) {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(command) => driver.handle(command, &mut frame_config),
                        Err(e) => {
                            tracing::warn!(error = %e, input = %line.trim(), "Ignoring command")
                        }
                    }
                }
                Ok(None) => {
                    tracing::debug!("stdin closed, no more commands");
                    stdin_open = false;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read command");
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    let clock = driver.clock();
    tracing::info!(
        frames = clock.frame_number(),
        started = %clock.epoch_wall(),
        elapsed_secs = %format_args!("{:.1}", clock.elapsed_secs()),
        fps = %format_args!("{:.1}", clock.average_fps()),
        touches = touches_seen,
        messages = driver.dispatcher().messages_sent(),
        failures = driver.dispatcher().send_failures(),
        "Stopped"
    );

    Ok(())
}
